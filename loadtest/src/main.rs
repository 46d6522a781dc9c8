//! Interactive test runner
//!
//! Selects a target environment, API key and probe set, then spawns the
//! probe binaries with TEST_BASE_URL / TEST_API_KEY set and exits with the
//! worst child exit code. Arguments not given on the command line are
//! prompted for interactively.

use std::path::PathBuf;
use std::process::Command;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use inquire::Select;

/// Available deployment targets
const ENVIRONMENTS: [(&str, &str, &str); 4] = [
    ("Production From TailNet", "10.0.0.101", "30080"),
    ("Development From TailNet", "10.0.0.101", "30081"),
    ("Production From Lab PC", "192.168.20.27", "980"),
    ("Development From Lab PC", "192.168.20.27", "981"),
];

#[derive(Debug, Parser)]
#[command(name = "tropo-loadtest", version, about = "TropoMetrics test runner")]
struct Args {
    /// Target environment (1-4)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=4))]
    env: Option<u8>,

    /// API key to probe with
    #[arg(short = 'k', long = "api-key", value_enum)]
    api_key: Option<KeyChoice>,

    /// Which probes to run
    #[arg(short = 't', long = "test", value_enum)]
    test: Option<TestChoice>,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum KeyChoice {
    Test,
    Demo,
    None,
}

impl KeyChoice {
    /// Value exported as TEST_API_KEY; "none" means no key at all, so the
    /// probes hit the missing-key path
    fn as_key(self) -> &'static str {
        match self {
            KeyChoice::Test => "test",
            KeyChoice::Demo => "demo",
            KeyChoice::None => "",
        }
    }

    fn label(self) -> &'static str {
        match self {
            KeyChoice::Test => "test",
            KeyChoice::Demo => "demo",
            KeyChoice::None => "No API Key (no parameter)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum TestChoice {
    Api,
    Html,
    Both,
}

impl TestChoice {
    fn probes(self) -> &'static [&'static str] {
        match self {
            TestChoice::Api => &["probe-api"],
            TestChoice::Html => &["probe-html"],
            TestChoice::Both => &["probe-api", "probe-html"],
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_index = match args.env {
        Some(n) => n as usize - 1,
        None => pick_environment()?,
    };
    let (name, ip, port) = ENVIRONMENTS[env_index];
    let base_url = format!("http://{ip}:{port}");

    let key = match args.api_key {
        Some(choice) => choice,
        None => pick_api_key()?,
    };

    let test = match args.test {
        Some(choice) => choice,
        None => pick_test()?,
    };

    println!();
    println!("{}", "=".repeat(60));
    println!("TropoMetrics Test Runner");
    println!("Target:  {name} ({base_url})");
    println!("API Key: {}", key.label());
    println!("{}", "=".repeat(60));

    let mut worst = 0;
    for probe in test.probes() {
        let code = run_probe(probe, &base_url, key.as_key())?;
        if code == 0 {
            println!("\n✓ {probe} completed successfully");
        } else {
            println!("\n✗ {probe} failed with exit code {code}");
        }
        worst = worst.max(code);
    }

    std::process::exit(worst);
}

fn pick_environment() -> anyhow::Result<usize> {
    let options: Vec<String> = ENVIRONMENTS
        .iter()
        .map(|(name, ip, port)| format!("{name:<25} http://{ip}:{port}"))
        .collect();
    let picked = Select::new("Select environment:", options.clone()).prompt()?;
    Ok(options.iter().position(|o| *o == picked).unwrap_or(0))
}

fn pick_api_key() -> anyhow::Result<KeyChoice> {
    let picked = Select::new("API key:", vec!["test", "demo", "none"]).prompt()?;
    Ok(match picked {
        "demo" => KeyChoice::Demo,
        "none" => KeyChoice::None,
        _ => KeyChoice::Test,
    })
}

fn pick_test() -> anyhow::Result<TestChoice> {
    let picked = Select::new("Test to run:", vec!["api", "html", "both"]).prompt()?;
    Ok(match picked {
        "html" => TestChoice::Html,
        "both" => TestChoice::Both,
        _ => TestChoice::Api,
    })
}

/// Probe binaries are installed next to the runner
fn sibling_binary(name: &str) -> anyhow::Result<PathBuf> {
    let current = std::env::current_exe().context("Cannot locate runner binary")?;
    let dir = current
        .parent()
        .context("Runner binary has no parent directory")?;
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// "none" exports an empty key, not the literal string "none"
    #[test]
    fn none_choice_exports_empty_key() {
        assert_eq!(KeyChoice::None.as_key(), "");
        assert_eq!(KeyChoice::Test.as_key(), "test");
        assert_eq!(KeyChoice::Demo.as_key(), "demo");
    }
}

fn run_probe(name: &str, base_url: &str, api_key: &str) -> anyhow::Result<i32> {
    println!();
    println!("{}", "=".repeat(60));
    println!("Running: {name}");
    println!("{}", "=".repeat(60));

    let status = Command::new(sibling_binary(name)?)
        .env("TEST_BASE_URL", base_url)
        .env("TEST_API_KEY", api_key)
        .status()
        .with_context(|| format!("Error running {name}"))?;

    Ok(status.code().unwrap_or(1))
}
