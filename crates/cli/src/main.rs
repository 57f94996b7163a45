// ABOUTME: CLI for the scenario metadata extraction pipeline.
// ABOUTME: Fetches one scenario URL and prints the extracted record as JSON.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use scandex_extract::Client;

/// Extract scenario metadata from a supported listing URL and print JSON.
#[derive(Parser, Debug)]
#[command(name = "scandex")]
#[command(about = "Extract scenario metadata from a Booth or Talto URL", long_about = None)]
struct Args {
    /// Scenario page URL (https, supported domains only).
    url: String,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Request deadline in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Also print the full error chain to stderr on failure.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build();

    match client.fetch_and_parse(&args.url).await {
        Ok(scenario) => match render(&scenario, args.compact) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("{}", err.user_message());
            if args.verbose {
                eprintln!("detail: {:#}", anyhow::Error::new(err));
            }
            ExitCode::FAILURE
        }
    }
}

fn render(scenario: &scandex_extract::ParsedScenario, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(scenario)
    } else {
        serde_json::to_string_pretty(scenario)
    };
    json.context("failed to serialize scenario")
}
