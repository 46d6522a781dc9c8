//! Shared plumbing for the load/latency probes
//!
//! The probes are black-box clients of a deployed TropoMetrics instance; the
//! only contract with the service is the URL and query-parameter surface.

use std::time::Duration;

/// Default probe target when TEST_BASE_URL is unset
pub const DEFAULT_BASE_URL: &str = "http://10.0.0.101:30081";

/// Target base URL from the environment, normalized to carry a scheme.
pub fn base_url() -> String {
    let url = match std::env::var("TEST_BASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            println!("TEST_BASE_URL not set — defaulting to {DEFAULT_BASE_URL}");
            DEFAULT_BASE_URL.to_string()
        }
    };

    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        println!("Normalizing base URL by prepending 'http://': {url}");
        format!("http://{url}")
    }
}

/// API key from the environment; empty means "probe without a key"
pub fn api_key() -> String {
    std::env::var("TEST_API_KEY").unwrap_or_else(|_| "test".to_string())
}

/// Weather endpoint URL for a key. An empty key omits the parameter
/// entirely so the probe exercises the missing-key path.
pub fn api_url(base_url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        format!("{base_url}/api")
    } else {
        format!("{base_url}/api?api_key={api_key}")
    }
}

/// Latency samples split by outcome
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub successes: Vec<Duration>,
    pub failures: Vec<Duration>,
}

impl LatencyStats {
    pub fn record_success(&mut self, latency: Duration) {
        self.successes.push(latency);
    }

    pub fn record_failure(&mut self, latency: Duration) {
        self.failures.push(latency);
    }

    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.successes.len() as f64 / self.total() as f64 * 100.0
    }

    /// Print the aggregate summary the runner scrapes from child output.
    pub fn print_summary(&self, label: &str) {
        println!();
        println!("=== {label} summary ===");
        println!("Requests:     {}", self.total());
        println!(
            "Successful:   {} ({:.1}%)",
            self.successes.len(),
            self.success_rate()
        );
        println!("Failed:       {}", self.failures.len());

        if self.successes.is_empty() {
            println!("No successful requests — no latency available.");
            return;
        }

        let min = self.successes.iter().min().copied().unwrap_or_default();
        let max = self.successes.iter().max().copied().unwrap_or_default();
        let avg = self.successes.iter().sum::<Duration>() / self.successes.len() as u32;
        println!("Latency min:  {:.3}s", min.as_secs_f64());
        println!("Latency avg:  {:.3}s", avg.as_secs_f64());
        println!("Latency max:  {:.3}s", max.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_over_mixed_outcomes() {
        let mut stats = LatencyStats::default();
        stats.record_success(Duration::from_millis(100));
        stats.record_success(Duration::from_millis(200));
        stats.record_failure(Duration::from_millis(900));
        assert_eq!(stats.total(), 3);
        assert!((stats.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn empty_stats_have_zero_rate() {
        let stats = LatencyStats::default();
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn api_url_carries_key_as_query_parameter() {
        assert_eq!(
            api_url("http://10.0.0.101:30081", "demo"),
            "http://10.0.0.101:30081/api?api_key=demo"
        );
    }

    /// An empty key drops the parameter so the target answers with the
    /// missing-key error rather than the invalid-key one
    #[test]
    fn api_url_omits_parameter_for_empty_key() {
        assert_eq!(api_url("http://10.0.0.101:30081", ""), "http://10.0.0.101:30081/api");
    }
}
