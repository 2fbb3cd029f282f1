use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::browser::chrome::ChromeOptions;
use crate::collectors::CrawlSettings;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Parser, Debug, Clone)]
#[command(name = "jobscraper", about = "Naukri.com job listing scraper")]
pub struct Config {
    /// Chrome/Chromium executable (auto-detected when unset)
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long, env = "HEADLESS", default_value = "true", action = clap::ArgAction::Set)]
    pub headless: bool,

    /// User agent sent by the browser
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Seconds to wait for listings after loading a results page
    #[arg(long, env = "PAGE_TIMEOUT", default_value = "15")]
    pub page_timeout: u64,

    /// Seconds to wait for a job details page
    #[arg(long, env = "DETAIL_TIMEOUT", default_value = "15")]
    pub detail_timeout: u64,

    /// Pause after each collected job, in milliseconds
    #[arg(long, env = "ITEM_DELAY_MS", default_value = "2000")]
    pub item_delay_ms: u64,

    /// Pause before the next results page, in milliseconds
    #[arg(long, env = "PAGE_DELAY_MS", default_value = "3000")]
    pub page_delay_ms: u64,

    /// Pause after expanding a job description, in milliseconds
    #[arg(long, env = "EXPAND_PAUSE_MS", default_value = "1000")]
    pub expand_pause_ms: u64,

    /// Stop after this many results pages
    #[arg(long, env = "MAX_PAGES", default_value = "100")]
    pub max_pages: u32,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape listings and write CSV and PDF reports
    Scrape {
        /// Job title from the catalog
        #[arg(long)]
        title: String,

        /// City from the catalog, or "All India"
        #[arg(long, default_value = "All India")]
        city: String,

        /// Number of jobs to collect (1-50)
        #[arg(long, default_value = "10")]
        count: u32,

        /// Directory for the reports
        #[arg(long, env = "OUT_DIR", default_value = ".")]
        out_dir: PathBuf,
    },
    /// List the supported job titles and cities (default when no subcommand given)
    Catalog,
}

impl Config {
    /// Resolve the command, defaulting to Catalog if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Catalog)
    }

    pub fn crawl_settings(&self) -> CrawlSettings {
        CrawlSettings {
            page_timeout: Duration::from_secs(self.page_timeout),
            detail_timeout: Duration::from_secs(self.detail_timeout),
            expand_pause: Duration::from_millis(self.expand_pause_ms),
            item_delay: Duration::from_millis(self.item_delay_ms),
            page_delay: Duration::from_millis(self.page_delay_ms),
            max_pages: self.max_pages,
        }
    }

    pub fn chrome_options(&self) -> ChromeOptions {
        ChromeOptions {
            headless: self.headless,
            chrome_path: self.chrome_path.clone(),
            user_agent: self.user_agent.clone(),
            navigation_timeout: Duration::from_secs(self.page_timeout),
        }
    }
}
