use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::models::criteria::{Location, SearchCriteria};

pub const BASE_URL: &str = "https://www.naukri.com";

/// Characters left unescaped in path slugs: alphanumerics plus `-_.~/`.
const SLUG_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Search URL for the first results page.
pub fn build(criteria: &SearchCriteria) -> String {
    build_with_base(BASE_URL, criteria)
}

pub fn build_with_base(base: &str, criteria: &SearchCriteria) -> String {
    let title = encode(&criteria.job_title.to_lowercase().replace(' ', "-"));
    match &criteria.location {
        Location::All => format!("{base}/{title}-jobs"),
        Location::City(city) => {
            let city = encode(&city.to_lowercase());
            format!("{base}/{title}-jobs-in-{city}")
        }
    }
}

/// Results page `page` (1-based) of a search.
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        base_url.to_string()
    } else {
        format!("{base_url}-{page}")
    }
}

/// Detail link without its query string.
pub fn canonical(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, SLUG_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(title: &str, location: Location) -> SearchCriteria {
        SearchCriteria::new(title, location, 5).unwrap()
    }

    #[test]
    fn test_build_all_locations() {
        assert_eq!(
            build(&criteria("Data Scientist", Location::All)),
            "https://www.naukri.com/data-scientist-jobs"
        );
    }

    #[test]
    fn test_build_with_city() {
        assert_eq!(
            build(&criteria("Data Scientist", Location::City("Bengaluru".into()))),
            "https://www.naukri.com/data-scientist-jobs-in-bengaluru"
        );
    }

    #[test]
    fn test_build_encodes_slugs() {
        assert_eq!(
            build(&criteria("UI/UX Designer", Location::All)),
            "https://www.naukri.com/ui/ux-designer-jobs"
        );
        assert_eq!(
            build(&criteria("C++ Developer", Location::City("New Delhi".into()))),
            "https://www.naukri.com/c%2B%2B-developer-jobs-in-new%20delhi"
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let c = criteria("Cloud Engineer", Location::City("Pune".into()));
        assert_eq!(build(&c), build(&c));
    }

    #[test]
    fn test_page_url() {
        let base = "https://www.naukri.com/data-scientist-jobs";
        assert_eq!(page_url(base, 1), base);
        assert_eq!(page_url(base, 3), format!("{base}-3"));
    }

    #[test]
    fn test_canonical_strips_query() {
        assert_eq!(
            canonical("https://www.naukri.com/job-listings-a-1?src=jobsearchDesk&sid=9"),
            "https://www.naukri.com/job-listings-a-1"
        );
        assert_eq!(canonical("https://x.test/a"), "https://x.test/a");
    }
}
