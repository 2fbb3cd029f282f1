use std::path::Path;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobscraper::browser::chrome::ChromeSession;
use jobscraper::collectors::{runner, url};
use jobscraper::config::{Command, Config};
use jobscraper::models::criteria::{ALL_LOCATIONS, CITIES, JOB_TITLES, SearchCriteria};
use jobscraper::models::session::CrawlSession;
use jobscraper::report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobscraper=info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match config.resolved_command() {
        Command::Catalog => print_catalog(),
        Command::Scrape {
            title,
            city,
            count,
            out_dir,
        } => scrape(&config, &title, &city, count, &out_dir).await?,
    }

    Ok(())
}

fn print_catalog() {
    println!("Job titles:");
    for title in JOB_TITLES {
        println!("  {title}");
    }
    println!("Cities:");
    println!("  {ALL_LOCATIONS}");
    for city in CITIES {
        println!("  {city}");
    }
}

async fn scrape(
    config: &Config,
    title: &str,
    city: &str,
    count: u32,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let criteria = SearchCriteria::from_catalog(title, city, count)?;
    let base_url = url::build(&criteria);
    tracing::info!("Searching {base_url} for {count} jobs");

    let mut browser = tokio::task::block_in_place(|| ChromeSession::launch(config.chrome_options()))?;
    let mut session = CrawlSession::new();
    let summary = runner::crawl(
        &mut browser,
        &mut session,
        &base_url,
        &criteria,
        &config.crawl_settings(),
    )
    .await?;
    drop(browser);

    if summary.is_partial() {
        tracing::warn!(
            "Collected {} of {} jobs ({:?})",
            summary.accepted,
            criteria.target_count,
            summary.stop
        );
    }

    if session.is_empty() {
        tracing::warn!("No jobs were scraped. Please try again or adjust your search criteria.");
        return Ok(());
    }

    let written = report::write_all(out_dir, session.records(), &criteria, Local::now()).await?;
    println!("{}", written.csv.display());
    println!("{}", written.pdf.display());

    Ok(())
}
