use tracing::debug;

use crate::browser::{BrowserError, BrowsingSession, Content, ContextHandle, ElementHandle, Locator};
use crate::collectors::{CrawlSettings, Outcome, Rejection, RejectionKind, locators, text, url};
use crate::models::criteria::SearchCriteria;
use crate::models::job::{JobDetails, SENTINEL};
use crate::models::session::CrawlSession;

enum Verdict {
    NotLoaded,
    Loaded(JobDetails),
}

/// Extract one listing item through an ephemeral detail context.
///
/// The detail link is opened in a new context and focused; once the page
/// is read the context is closed and focus returns to the context that was
/// active on entry, whatever the outcome. Accepted records are appended to
/// `session`. Only a failure to restore the original context is returned as
/// `Err`; everything else is a rejection.
pub async fn extract<B>(
    browser: &mut B,
    session: &mut CrawlSession,
    listing: &ElementHandle,
    criteria: &SearchCriteria,
    settings: &CrawlSettings,
) -> Result<Outcome, BrowserError>
where
    B: BrowsingSession + ?Sized,
{
    let origin = browser.active();

    let href = match browser
        .child_attribute(listing, &locators::DETAIL_LINK, "href")
        .await
    {
        Ok(Some(href)) if !href.trim().is_empty() => href,
        Ok(_) => return Ok(rejected(None, RejectionKind::MissingLink)),
        Err(e) => return Ok(rejected(None, failed(&e))),
    };
    let detail_url = url::canonical(href.trim()).to_string();

    let context = match browser.open_context(&detail_url).await {
        Ok(context) => context,
        Err(e) => return Ok(rejected(Some(detail_url), failed(&e))),
    };

    let verdict = match browser.focus(context).await {
        Ok(()) => read_detail(browser, &detail_url, settings).await,
        Err(e) => Err(e),
    };

    restore(browser, context, origin).await?;

    let details = match verdict {
        Ok(Verdict::Loaded(details)) => details,
        Ok(Verdict::NotLoaded) => return Ok(rejected(Some(detail_url), RejectionKind::LoadTimeout)),
        Err(e) => return Ok(rejected(Some(detail_url), failed(&e))),
    };

    if !criteria.location.matches(&details.location) {
        let location = details.location;
        return Ok(rejected(
            Some(detail_url),
            RejectionKind::LocationMismatch { location },
        ));
    }

    let record = session.accept(details);
    debug!("Accepted job {} from {}", record.id, record.details.detail_url);
    Ok(Outcome::Accepted(record.id))
}

/// Close the detail context and refocus `origin`, attempting both even if
/// the close fails.
async fn restore<B>(
    browser: &mut B,
    context: ContextHandle,
    origin: ContextHandle,
) -> Result<(), BrowserError>
where
    B: BrowsingSession + ?Sized,
{
    let closed = browser.close_context(context).await;
    let focused = browser.focus(origin).await;
    closed.and(focused)
}

async fn read_detail<B>(
    browser: &mut B,
    detail_url: &str,
    settings: &CrawlSettings,
) -> Result<Verdict, BrowserError>
where
    B: BrowsingSession + ?Sized,
{
    match browser
        .wait_for_any(&[locators::DETAIL_ROOT], settings.detail_timeout)
        .await
    {
        Ok(_) => {}
        Err(BrowserError::Timeout { .. }) => return Ok(Verdict::NotLoaded),
        Err(e) => return Err(e),
    }

    if browser.click(&locators::READ_MORE).await? {
        tokio::time::sleep(settings.expand_pause).await;
    }

    let (company, review_score) =
        text::split_company_reviews(&read_text(browser, &locators::COMPANY).await?);
    let key_skills = match browser.read(&locators::KEY_SKILLS, Content::Markup).await? {
        Some(markup) => text::parse_key_skills(&markup),
        None => SENTINEL.to_string(),
    };

    Ok(Verdict::Loaded(JobDetails {
        title: read_text(browser, &locators::TITLE).await?,
        company,
        review_score,
        location: read_text(browser, &locators::LOCATION).await?,
        experience: read_text(browser, &locators::EXPERIENCE).await?,
        salary: read_text(browser, &locators::SALARY).await?,
        posted_on: read_text(browser, &locators::POSTED_ON).await?,
        openings: read_text(browser, &locators::OPENINGS).await?,
        application_count: read_text(browser, &locators::APPLICANTS).await?,
        description: text::normalize(&read_text(browser, &locators::DESCRIPTION).await?),
        role: read_text(browser, &locators::ROLE).await?,
        industry_type: read_text(browser, &locators::INDUSTRY_TYPE).await?,
        department: read_text(browser, &locators::DEPARTMENT).await?,
        employment_type: read_text(browser, &locators::EMPLOYMENT_TYPE).await?,
        role_category: read_text(browser, &locators::ROLE_CATEGORY).await?,
        education: text::strip_education_label(&read_text(browser, &locators::EDUCATION).await?),
        key_skills,
        detail_url: detail_url.to_string(),
    }))
}

/// Trimmed text of `locator`, or the sentinel when it is missing or blank.
async fn read_text<B>(browser: &mut B, locator: &Locator) -> Result<String, BrowserError>
where
    B: BrowsingSession + ?Sized,
{
    let value = browser.read(locator, Content::Text).await?;
    if value.is_none() {
        debug!("Field not found: {locator}");
    }
    Ok(text::or_sentinel(value.unwrap_or_default().trim()))
}

fn rejected(url: Option<String>, kind: RejectionKind) -> Outcome {
    Outcome::Rejected(Rejection { url, kind })
}

fn failed(e: &BrowserError) -> RejectionKind {
    RejectionKind::Failed {
        reason: e.to_string(),
    }
}
