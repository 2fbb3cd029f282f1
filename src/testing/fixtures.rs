//! Fake Naukri pages built on the real locator contract.

use crate::browser::Locator;
use crate::collectors::locators;
use crate::testing::fake::{FakeElement, FakePage};

/// A results page whose items link to `detail_urls`, using the current
/// listing marker.
pub fn listing_page(detail_urls: &[&str]) -> FakePage {
    listing_page_with(&locators::LISTING_ITEMS[0], detail_urls)
}

/// A results page using a specific listing marker.
pub fn listing_page_with(marker: &Locator, detail_urls: &[&str]) -> FakePage {
    detail_urls.iter().fold(FakePage::new(), |page, url| {
        page.with(
            marker.clone(),
            FakeElement::text("listing").with_child(
                locators::DETAIL_LINK,
                FakeElement::text("apply").with_attribute("href", *url),
            ),
        )
    })
}

/// A fully populated detail page.
pub fn detail_page(title: &str, company_header: &str, location: &str) -> FakePage {
    FakePage::new()
        .with(locators::DETAIL_ROOT, FakeElement::text(""))
        .with(locators::READ_MORE, FakeElement::text("read more"))
        .with(locators::TITLE, FakeElement::text(title))
        .with(locators::COMPANY, FakeElement::text(company_header))
        .with(locators::LOCATION, FakeElement::text(location))
        .with(locators::EXPERIENCE, FakeElement::text("3 - 5 years"))
        .with(locators::SALARY, FakeElement::text("Not Disclosed"))
        .with(locators::POSTED_ON, FakeElement::text("2 days ago"))
        .with(locators::OPENINGS, FakeElement::text("4"))
        .with(locators::APPLICANTS, FakeElement::text("100+"))
        .with(locators::ROLE, FakeElement::text("Data Scientist"))
        .with(locators::INDUSTRY_TYPE, FakeElement::text("IT Services & Consulting"))
        .with(locators::DEPARTMENT, FakeElement::text("Data Science & Analytics"))
        .with(locators::EMPLOYMENT_TYPE, FakeElement::text("Full Time, Permanent"))
        .with(
            locators::ROLE_CATEGORY,
            FakeElement::text("Data Science & Machine Learning"),
        )
        .with(
            locators::EDUCATION,
            FakeElement::text("Education\nUG: Any Graduate"),
        )
        .with(
            locators::KEY_SKILLS,
            FakeElement::markup(
                "<div><h3>Key Skills</h3><a><span>Python</span></a><a><span>SQL</span></a></div>",
            ),
        )
        .with(
            locators::DESCRIPTION,
            FakeElement::text("Responsibilities:\n\n\nBuild models - ship them"),
        )
}
