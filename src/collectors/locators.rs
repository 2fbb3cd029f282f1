// Naukri.com markup contract. Class names carry build hashes and change
// when the site redeploys; everything site-specific lives here.

use std::borrow::Cow;

use crate::browser::Locator;

const fn css(s: &'static str) -> Locator {
    Locator::Css(Cow::Borrowed(s))
}

const fn xpath(s: &'static str) -> Locator {
    Locator::XPath(Cow::Borrowed(s))
}

macro_rules! stats_label {
    ($label:literal) => {
        xpath(concat!(
            "//div[contains(@class, 'styles_jhc__jd-stats__KrId0')]",
            "//span[normalize-space(label)='",
            $label,
            "']/span"
        ))
    };
}

macro_rules! other_details_label {
    ($label:literal) => {
        xpath(concat!(
            "//div[contains(@class, 'styles_other-details__oEN4O')]",
            "//div[contains(label, '",
            $label,
            "')]/span"
        ))
    };
}

/// Listing wrappers, current markup first.
pub const LISTING_ITEMS: [Locator; 2] = [css(".srp-jobtuple-wrapper"), css(".jobTuple")];

/// Link to the detail page inside a listing item.
pub const DETAIL_LINK: Locator = css("a");

pub const DETAIL_ROOT: Locator = css(".styles_job-header-container___0wLZ");

pub const READ_MORE: Locator = xpath(concat!(
    "//span[contains(translate(text(), 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), 'read more')",
    " or contains(translate(text(), 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), 'see more')]"
));

pub const TITLE: Locator = xpath("//h1[contains(@class, 'styles_jd-header-title__rZwM1')]");
pub const COMPANY: Locator = xpath("//div[contains(@class, 'styles_jd-header-comp-name__MvqAI')]");
pub const LOCATION: Locator = xpath("//div[contains(@class, 'styles_jhc__loc___Du2H')]");
pub const EXPERIENCE: Locator = xpath("//div[contains(@class, 'styles_jhc__exp__k_giM')]");
pub const SALARY: Locator = xpath("//div[contains(@class, 'styles_jhc__salary__jdfEC')]");

pub const POSTED_ON: Locator = stats_label!("Posted:");
pub const OPENINGS: Locator = stats_label!("Openings:");
pub const APPLICANTS: Locator = stats_label!("Applicants:");

pub const ROLE: Locator = other_details_label!("Role:");
pub const INDUSTRY_TYPE: Locator = other_details_label!("Industry Type:");
pub const DEPARTMENT: Locator = other_details_label!("Department:");
pub const EMPLOYMENT_TYPE: Locator = other_details_label!("Employment Type:");
pub const ROLE_CATEGORY: Locator = other_details_label!("Role Category:");

pub const EDUCATION: Locator = xpath("//div[contains(@class, 'styles_education__KXFkO')]");
pub const KEY_SKILLS: Locator = xpath("//div[contains(@class, 'styles_key-skill__GIPn_')]");
pub const DESCRIPTION: Locator =
    xpath("//div[contains(@class, 'styles_JDC__dang-inner-html__h0K4t')]");
