//! Sequential HTTP probe against the weather endpoint
//!
//! Issues a fixed number of GETs to `/api?api_key=<key>`, classifies each by
//! status code and payload shape, and prints aggregate latency statistics.
//! Target and key come from TEST_BASE_URL / TEST_API_KEY.

use std::time::Instant;

use tropometrics_loadtest::{api_key, api_url, base_url, LatencyStats};

/// Sequential requests per run; TEST_ATTEMPTS overrides
const DEFAULT_ATTEMPTS: usize = 1000;

/// Top-level sections a well-formed report must carry
const REPORT_SECTIONS: [&str; 6] = [
    "\"metadata\"",
    "\"current\"",
    "\"daily\"",
    "\"moisture\"",
    "\"irrigation\"",
    "\"forecast\"",
];

fn attempts() -> usize {
    std::env::var("TEST_ATTEMPTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_ATTEMPTS)
}

fn is_well_formed(body: &str) -> bool {
    REPORT_SECTIONS.iter().all(|section| body.contains(section))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = api_url(&base_url(), &api_key());
    let attempts = attempts();
    println!("Probing API endpoint: {url} ({attempts} sequential requests)");

    let client = reqwest::Client::new();
    let mut stats = LatencyStats::default();

    for attempt in 1..=attempts {
        let start = Instant::now();
        let outcome = client.get(&url).send().await;
        match outcome {
            Ok(response) if response.status().is_success() => {
                let body = response.text().await.unwrap_or_default();
                let latency = start.elapsed();
                if is_well_formed(&body) {
                    stats.record_success(latency);
                } else {
                    println!("Attempt {attempt}: malformed payload");
                    stats.record_failure(latency);
                }
            }
            Ok(response) => {
                println!("Attempt {attempt}: HTTP {}", response.status());
                stats.record_failure(start.elapsed());
            }
            Err(err) => {
                println!("Attempt {attempt}: request error: {err}");
                stats.record_failure(start.elapsed());
            }
        }
    }

    stats.print_summary("API probe");

    if stats.successes.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
