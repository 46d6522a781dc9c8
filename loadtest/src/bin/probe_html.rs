//! Browser probe against the HTML report page
//!
//! Drives a WebDriver session (WEBDRIVER_URL, default localhost:4444) to the
//! report page and times how long the irrigation marker text takes to
//! appear. Target and key come from TEST_BASE_URL / TEST_API_KEY.

use std::time::{Duration, Instant};

use fantoccini::{ClientBuilder, Locator};

use tropometrics_loadtest::{api_key, api_url, base_url, LatencyStats};

/// Browser round-trips per run
const ATTEMPTS: usize = 5;

/// Maximum wait for the marker text
const WAIT_TIMEOUT: Duration = Duration::from_secs(20);

/// Either irrigation advice string marks a fully rendered report
const MARKER_XPATH: &str =
    "//*[contains(text(), 'Geef water') or contains(text(), 'Water geven is nu niet nodig')]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let webdriver_url =
        std::env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:4444".to_string());
    let url = api_url(&base_url(), &api_key());
    println!("Probing HTML page: {url} via {webdriver_url}");

    let client = ClientBuilder::rustls()?.connect(&webdriver_url).await?;
    let mut stats = LatencyStats::default();

    for attempt in 1..=ATTEMPTS {
        let start = Instant::now();
        client.goto(&url).await?;

        let found = client
            .wait()
            .at_most(WAIT_TIMEOUT)
            .for_element(Locator::XPath(MARKER_XPATH))
            .await;

        let latency = start.elapsed();
        match found {
            Ok(_) => {
                println!("Attempt {attempt}: marker visible after {:.3}s", latency.as_secs_f64());
                stats.record_success(latency);
            }
            Err(err) => {
                println!("Attempt {attempt}: marker not found: {err}");
                stats.record_failure(latency);
            }
        }
    }

    client.close().await?;
    stats.print_summary("HTML probe");

    if stats.successes.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
