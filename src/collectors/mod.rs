// Crawl pipeline: the search URL, the page-by-page runner and the
// per-listing detail extractor, plus the text cleanup they share.

pub mod detail;
pub mod locators;
pub mod runner;
pub mod text;
pub mod url;

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Timeouts and pacing for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Bound on waiting for listing markers after each page navigation.
    pub page_timeout: Duration,
    /// Bound on waiting for the detail header in a detail context.
    pub detail_timeout: Duration,
    /// Pause after clicking "read more".
    pub expand_pause: Duration,
    /// Pause after each accepted listing.
    pub item_delay: Duration,
    /// Pause before loading the next results page.
    pub page_delay: Duration,
    /// Hard stop on the number of results pages visited.
    pub max_pages: u32,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(15),
            detail_timeout: Duration::from_secs(15),
            expand_pause: Duration::from_secs(1),
            item_delay: Duration::from_secs(2),
            page_delay: Duration::from_secs(3),
            max_pages: 100,
        }
    }
}

impl CrawlSettings {
    /// No pauses at all; waits still time out immediately when nothing matches.
    pub fn immediate() -> Self {
        Self {
            page_timeout: Duration::ZERO,
            detail_timeout: Duration::ZERO,
            expand_pause: Duration::ZERO,
            item_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Result of running the detail extractor on one listing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record was appended to the session under this id.
    Accepted(u32),
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Detail URL, when the listing had one.
    pub url: Option<String>,
    pub kind: RejectionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionKind {
    MissingLink,
    LoadTimeout,
    LocationMismatch { location: String },
    Failed { reason: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.url.as_deref().unwrap_or("<no link>");
        match &self.kind {
            RejectionKind::MissingLink => write!(f, "listing has no detail link"),
            RejectionKind::LoadTimeout => write!(f, "job details page didn't load: {url}"),
            RejectionKind::LocationMismatch { location } => {
                write!(f, "skipping job outside requested location ({location}): {url}")
            }
            RejectionKind::Failed { reason } => write!(f, "error processing {url}: {reason}"),
        }
    }
}

/// Why pagination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    PageLoadFailed { page: u32, url: String },
    EmptyPage { page: u32 },
    PageLimit { pages: u32 },
}

#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub accepted: usize,
    pub pages_visited: u32,
    pub stop: StopReason,
    pub rejections: Vec<Rejection>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// True when the crawl ran out of pages before reaching its target.
    pub fn is_partial(&self) -> bool {
        self.stop != StopReason::TargetReached
    }
}
