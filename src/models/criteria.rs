use std::fmt;

use crate::error::AppError;

pub const MIN_TARGET_COUNT: u32 = 1;
pub const MAX_TARGET_COUNT: u32 = 50;

/// Display name of the nationwide location.
pub const ALL_LOCATIONS: &str = "All India";

pub const JOB_TITLES: [&str; 25] = [
    "Data Scientist",
    "Software Engineer",
    "Web Developer",
    "Full Stack Developer",
    "Frontend Developer",
    "Backend Developer",
    "DevOps Engineer",
    "Cloud Engineer",
    "Data Engineer",
    "Machine Learning Engineer",
    "AI Engineer",
    "Big Data Engineer",
    "Database Administrator",
    "Systems Administrator",
    "Network Engineer",
    "Cyber Security Analyst",
    "IT Support Engineer",
    "Mobile App Developer",
    "UI/UX Designer",
    "Product Manager",
    "Project Manager",
    "Business Analyst",
    "QA Engineer",
    "Embedded Systems Engineer",
    "Blockchain Developer",
];

pub const CITIES: [&str; 23] = [
    "Bengaluru",
    "Mumbai",
    "Delhi",
    "Hyderabad",
    "Chennai",
    "Pune",
    "Kolkata",
    "Ahmedabad",
    "Gurgaon",
    "Noida",
    "Jaipur",
    "Lucknow",
    "Chandigarh",
    "Indore",
    "Bhopal",
    "Coimbatore",
    "Vadodara",
    "Nagpur",
    "Visakhapatnam",
    "Kochi",
    "Patna",
    "Bhubaneswar",
    "Surat",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    All,
    City(String),
}

impl Location {
    /// `"ALL"` and `"All India"` (any case) mean no location restriction.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") || raw.eq_ignore_ascii_case(ALL_LOCATIONS) {
            Location::All
        } else {
            Location::City(raw.to_string())
        }
    }

    /// Case-insensitive substring match against an extracted location.
    pub fn matches(&self, extracted: &str) -> bool {
        match self {
            Location::All => true,
            Location::City(city) => extracted.to_lowercase().contains(&city.to_lowercase()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::All => f.write_str(ALL_LOCATIONS),
            Location::City(city) => f.write_str(city),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub job_title: String,
    pub location: Location,
    pub target_count: u32,
}

impl SearchCriteria {
    pub fn new(
        job_title: impl Into<String>,
        location: Location,
        target_count: u32,
    ) -> Result<Self, AppError> {
        let job_title = job_title.into().trim().to_string();
        if job_title.is_empty() {
            return Err(AppError::InvalidCriteria("job title is empty".to_string()));
        }
        if !(MIN_TARGET_COUNT..=MAX_TARGET_COUNT).contains(&target_count) {
            return Err(AppError::InvalidCriteria(format!(
                "job count must be between {MIN_TARGET_COUNT} and {MAX_TARGET_COUNT}, got {target_count}"
            )));
        }
        Ok(Self {
            job_title,
            location,
            target_count,
        })
    }

    /// Build criteria restricted to the fixed title and city catalogs.
    /// Matching is case-insensitive; the catalog spelling is kept.
    pub fn from_catalog(title: &str, city: &str, target_count: u32) -> Result<Self, AppError> {
        let job_title = JOB_TITLES
            .iter()
            .find(|t| t.eq_ignore_ascii_case(title.trim()))
            .ok_or_else(|| AppError::InvalidCriteria(format!("unknown job title '{title}'")))?;

        let location = match Location::parse(city) {
            Location::All => Location::All,
            Location::City(name) => CITIES
                .iter()
                .find(|c| c.eq_ignore_ascii_case(&name))
                .map(|c| Location::City((*c).to_string()))
                .ok_or_else(|| AppError::InvalidCriteria(format!("unknown city '{city}'")))?,
        };

        Self::new(*job_title, location, target_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        assert_eq!(Location::parse("ALL"), Location::All);
        assert_eq!(Location::parse("all india"), Location::All);
        assert_eq!(Location::parse(" Pune "), Location::City("Pune".to_string()));
    }

    #[test]
    fn test_location_matches_case_insensitive_substring() {
        let pune = Location::City("Pune".to_string());
        assert!(pune.matches("Hybrid - PUNE, Mumbai"));
        assert!(!pune.matches("Bengaluru"));
        assert!(!pune.matches("NA"));
        assert!(Location::All.matches("anywhere"));
    }

    #[test]
    fn test_target_count_bounds() {
        assert!(SearchCriteria::new("Data Scientist", Location::All, 0).is_err());
        assert!(SearchCriteria::new("Data Scientist", Location::All, 51).is_err());
        assert!(SearchCriteria::new("Data Scientist", Location::All, 50).is_ok());
        assert!(SearchCriteria::new("  ", Location::All, 5).is_err());
    }

    #[test]
    fn test_from_catalog_normalizes_spelling() {
        let criteria = SearchCriteria::from_catalog("data scientist", "bengaluru", 5).unwrap();
        assert_eq!(criteria.job_title, "Data Scientist");
        assert_eq!(criteria.location, Location::City("Bengaluru".to_string()));

        let all = SearchCriteria::from_catalog("QA Engineer", "All India", 1).unwrap();
        assert_eq!(all.location, Location::All);
    }

    #[test]
    fn test_from_catalog_rejects_unknown_entries() {
        assert!(SearchCriteria::from_catalog("Astronaut", "Pune", 5).is_err());
        assert!(SearchCriteria::from_catalog("Data Scientist", "Atlantis", 5).is_err());
    }
}
