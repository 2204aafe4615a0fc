mod browser;
mod clean;
mod crawl;
mod extract;
mod links;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use url::Url;

use crawl::CrawlConfig;
use extract::SelectorMap;

#[derive(Parser)]
#[command(
    name = "profile_scraper",
    about = "Single-site section scraper driven by a headless browser"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the site and write the cleaned JSON document
    Run {
        /// Crawl root; also the same-origin filter for discovered links
        #[arg(long)]
        base_url: Url,
        /// Where the JSON result is written
        #[arg(long, default_value = "output.json")]
        output: PathBuf,
        /// Chrome/Chromium binary (auto-detected when omitted)
        #[arg(long)]
        driver_path: Option<PathBuf>,
        /// Run the browser without a visible window
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        headless: bool,
        /// Pause between successive page fetches, in seconds
        #[arg(long, default_value_t = 2.0)]
        delay: f64,
    },
    /// Print the same-origin links discovered on the base page
    Links {
        #[arg(long)]
        base_url: Url,
        #[arg(long)]
        driver_path: Option<PathBuf>,
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        headless: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            base_url,
            output,
            driver_path,
            headless,
            delay,
        } => {
            let config = CrawlConfig {
                base_url,
                output_file: output,
                driver_path,
                headless,
                delay,
                selectors: SelectorMap::default(),
            };
            crawl::run(&config).await.map(|summary| {
                println!(
                    "Data successfully scraped, cleaned, and saved to {}",
                    config.output_file.display()
                );
                println!(
                    "Visited {} pages, kept {} strings",
                    summary.pages, summary.strings
                );
            })
        }
        Commands::Links {
            base_url,
            driver_path,
            headless,
        } => {
            let opts = browser::BrowserOptions {
                driver_path,
                headless,
            };
            crawl::discover(&base_url, &opts).await.map(|found| {
                for link in &found {
                    println!("{link}");
                }
                println!("{} same-origin links on {}", found.len(), base_url);
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}
