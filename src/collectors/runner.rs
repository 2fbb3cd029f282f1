use chrono::Utc;

use crate::browser::{BrowserError, BrowsingSession};
use crate::collectors::{CrawlSettings, CrawlSummary, Outcome, StopReason, detail, locators, url};
use crate::models::criteria::SearchCriteria;
use crate::models::session::CrawlSession;

/// Walk the results pages from `base_url`, extracting listings until
/// `criteria.target_count` records are accepted or the pages run out.
///
/// Running out of pages is not an error: whatever was collected stays in
/// `session` and the summary says why the crawl stopped. `Err` means the
/// browser could not get back to the listing context.
pub async fn crawl<B>(
    browser: &mut B,
    session: &mut CrawlSession,
    base_url: &str,
    criteria: &SearchCriteria,
    settings: &CrawlSettings,
) -> Result<CrawlSummary, BrowserError>
where
    B: BrowsingSession + ?Sized,
{
    let started_at = Utc::now();
    let target = criteria.target_count as usize;
    let mut collected = 0usize;
    let mut page = 1u32;
    let mut pages_visited = 0u32;
    let mut rejections = Vec::new();

    let stop = loop {
        if collected >= target {
            break StopReason::TargetReached;
        }
        if page > settings.max_pages {
            tracing::warn!("Page limit of {} reached", settings.max_pages);
            break StopReason::PageLimit {
                pages: settings.max_pages,
            };
        }

        let page_url = url::page_url(base_url, page);
        tracing::info!("Scraping page {page}... ({collected}/{target} jobs collected)");

        let loaded = match browser.navigate(&page_url).await {
            Ok(()) => {
                browser
                    .wait_for_any(&locators::LISTING_ITEMS, settings.page_timeout)
                    .await
            }
            Err(e) => Err(e),
        };
        let marker = match loaded {
            Ok(marker) => marker,
            Err(e) => {
                tracing::warn!("Page load failed or no jobs found at {page_url}: {e}");
                break StopReason::PageLoadFailed {
                    page,
                    url: page_url,
                };
            }
        };
        pages_visited += 1;

        let items = match browser.query_all(&marker).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to list jobs on {page_url}: {e}");
                Vec::new()
            }
        };
        if items.is_empty() {
            tracing::warn!("No job listings found on page {page}");
            break StopReason::EmptyPage { page };
        }

        for item in &items {
            if collected >= target {
                break;
            }
            match detail::extract(browser, session, item, criteria, settings).await? {
                Outcome::Accepted(id) => {
                    collected += 1;
                    tracing::info!("Collected job {id} ({collected}/{target})");
                    tokio::time::sleep(settings.item_delay).await;
                }
                Outcome::Rejected(rejection) => {
                    tracing::warn!("Skipped listing: {rejection}");
                    rejections.push(rejection);
                }
            }
        }

        if collected < target {
            page += 1;
            tokio::time::sleep(settings.page_delay).await;
        }
    };

    tracing::info!(
        "Completed! Collected {collected} jobs from {pages_visited} pages ({} skipped)",
        rejections.len()
    );

    Ok(CrawlSummary {
        accepted: collected,
        pages_visited,
        stop,
        rejections,
        started_at,
        finished_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::criteria::Location;
    use crate::testing::FakeBrowser;
    use crate::testing::fixtures::{detail_page, listing_page, listing_page_with};

    const BASE: &str = "https://www.naukri.com/data-engineer-jobs";

    fn detail_url(n: usize) -> String {
        format!("https://www.naukri.com/job-listings-data-engineer-{n}")
    }

    /// `pages` results pages, each listing `per_page` jobs located in `city`.
    fn site(pages: usize, per_page: usize, city: &str) -> FakeBrowser {
        let mut browser = FakeBrowser::new();
        for p in 1..=pages {
            let urls: Vec<String> = (0..per_page).map(|i| detail_url(p * 100 + i)).collect();
            let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
            browser = browser.with_page(url::page_url(BASE, p as u32), listing_page(&refs));
            for u in &urls {
                browser = browser.with_page(u.clone(), detail_page("Data Engineer", "Acme", city));
            }
        }
        browser
    }

    fn criteria(count: u32) -> SearchCriteria {
        SearchCriteria::new("Data Engineer", Location::All, count).unwrap()
    }

    #[tokio::test]
    async fn test_stops_at_target_mid_page() {
        let mut browser = site(3, 4, "Pune");
        let mut session = CrawlSession::new();

        let summary = crawl(
            &mut browser,
            &mut session,
            BASE,
            &criteria(6),
            &CrawlSettings::immediate(),
        )
        .await
        .unwrap();

        assert_eq!(summary.accepted, 6);
        assert_eq!(summary.stop, StopReason::TargetReached);
        assert_eq!(summary.pages_visited, 2);
        assert_eq!(session.len(), 6);
        assert_eq!(
            browser.navigations(),
            &[BASE.to_string(), format!("{BASE}-2")]
        );
        assert_eq!(browser.opened().len(), 6);
    }

    #[tokio::test]
    async fn test_runs_out_of_pages_without_error() {
        let mut browser = site(2, 2, "Pune");
        let mut session = CrawlSession::new();

        let summary = crawl(
            &mut browser,
            &mut session,
            BASE,
            &criteria(10),
            &CrawlSettings::immediate(),
        )
        .await
        .unwrap();

        assert_eq!(summary.accepted, 4);
        assert!(summary.is_partial());
        assert_eq!(
            summary.stop,
            StopReason::PageLoadFailed {
                page: 3,
                url: format!("{BASE}-3"),
            }
        );
        assert_eq!(session.len(), 4);
    }

    #[tokio::test]
    async fn test_listing_items_without_links_are_skipped() {
        let mut browser = site(1, 1, "Pune").with_page(
            url::page_url(BASE, 2),
            listing_page(&[]).with(
                locators::LISTING_ITEMS[1].clone(),
                crate::testing::FakeElement::text("placeholder"),
            ),
        );
        let mut session = CrawlSession::new();

        let summary = crawl(
            &mut browser,
            &mut session,
            BASE,
            &criteria(5),
            &CrawlSettings::immediate(),
        )
        .await
        .unwrap();

        // The legacy marker matched, but its items carry no links.
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejections.len(), 1);
        assert_eq!(
            summary.stop,
            StopReason::PageLoadFailed {
                page: 3,
                url: format!("{BASE}-3"),
            }
        );
    }

    #[tokio::test]
    async fn test_legacy_listing_marker() {
        let detail = detail_url(1);
        let mut browser = FakeBrowser::new()
            .with_page(
                BASE,
                listing_page_with(&locators::LISTING_ITEMS[1], &[detail.as_str()]),
            )
            .with_page(detail.clone(), detail_page("Data Engineer", "Acme", "Pune"));
        let mut session = CrawlSession::new();

        let summary = crawl(
            &mut browser,
            &mut session,
            BASE,
            &criteria(1),
            &CrawlSettings::immediate(),
        )
        .await
        .unwrap();

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.stop, StopReason::TargetReached);
    }

    #[tokio::test]
    async fn test_page_limit() {
        let mut browser = site(5, 1, "Mumbai");
        let mut session = CrawlSession::new();
        let criteria = SearchCriteria::new("Data Engineer", Location::City("Pune".into()), 3).unwrap();
        let settings = CrawlSettings {
            max_pages: 2,
            ..CrawlSettings::immediate()
        };

        let summary = crawl(&mut browser, &mut session, BASE, &criteria, &settings)
            .await
            .unwrap();

        assert_eq!(summary.accepted, 0);
        assert_eq!(summary.stop, StopReason::PageLimit { pages: 2 });
        assert_eq!(summary.rejections.len(), 2);
        assert_eq!(browser.navigations().len(), 2);
    }
}
