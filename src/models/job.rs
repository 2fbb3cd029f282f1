use std::borrow::Cow;

/// Stand-in for any field the detail page did not provide.
pub const SENTINEL: &str = "NA";

/// Report column headers, in record order.
pub const COLUMNS: [&str; 19] = [
    "Job ID",
    "Job Title",
    "Company",
    "Reviews",
    "Location",
    "Experience",
    "Salary",
    "Posted On",
    "Openings",
    "Applications",
    "Job Description",
    "Role",
    "Industry Type",
    "Department",
    "Employment Type",
    "Role Category",
    "Education",
    "Key Skills",
    "Job URL",
];

/// Fields extracted from one detail page, before the session assigns an id.
/// Every text field holds a value or [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetails {
    pub title: String,
    pub company: String,
    pub review_score: String,
    pub location: String,
    pub experience: String,
    pub salary: String,
    pub posted_on: String,
    pub openings: String,
    pub application_count: String,
    pub description: String,
    pub role: String,
    pub industry_type: String,
    pub department: String,
    pub employment_type: String,
    pub role_category: String,
    pub education: String,
    pub key_skills: String,
    /// Canonical detail URL, query string stripped.
    pub detail_url: String,
}

impl JobDetails {
    /// Details with every field set to the sentinel.
    pub fn empty(detail_url: impl Into<String>) -> Self {
        let na = || SENTINEL.to_string();
        Self {
            title: na(),
            company: na(),
            review_score: na(),
            location: na(),
            experience: na(),
            salary: na(),
            posted_on: na(),
            openings: na(),
            application_count: na(),
            description: na(),
            role: na(),
            industry_type: na(),
            department: na(),
            employment_type: na(),
            role_category: na(),
            education: na(),
            key_skills: na(),
            detail_url: detail_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: u32,
    pub details: JobDetails,
}

impl JobRecord {
    /// Spreadsheet formula linking to the detail page, or the sentinel.
    pub fn hyperlink(&self) -> String {
        let url = &self.details.detail_url;
        if url.is_empty() || url == SENTINEL {
            SENTINEL.to_string()
        } else {
            format!("=HYPERLINK(\"{url}\", \"View Job\")")
        }
    }

    /// Values in [`COLUMNS`] order.
    pub fn columns(&self) -> [Cow<'_, str>; 19] {
        let d = &self.details;
        [
            Cow::Owned(self.id.to_string()),
            Cow::Borrowed(d.title.as_str()),
            Cow::Borrowed(d.company.as_str()),
            Cow::Borrowed(d.review_score.as_str()),
            Cow::Borrowed(d.location.as_str()),
            Cow::Borrowed(d.experience.as_str()),
            Cow::Borrowed(d.salary.as_str()),
            Cow::Borrowed(d.posted_on.as_str()),
            Cow::Borrowed(d.openings.as_str()),
            Cow::Borrowed(d.application_count.as_str()),
            Cow::Borrowed(d.description.as_str()),
            Cow::Borrowed(d.role.as_str()),
            Cow::Borrowed(d.industry_type.as_str()),
            Cow::Borrowed(d.department.as_str()),
            Cow::Borrowed(d.employment_type.as_str()),
            Cow::Borrowed(d.role_category.as_str()),
            Cow::Borrowed(d.education.as_str()),
            Cow::Borrowed(d.key_skills.as_str()),
            Cow::Owned(self.hyperlink()),
        ]
    }
}

/// Pull the target URL back out of a `=HYPERLINK("…", …)` formula.
pub fn hyperlink_target(formula: &str) -> Option<&str> {
    let rest = formula.split_once("HYPERLINK(\"")?.1;
    let (url, _) = rest.split_once('"')?;
    (!url.is_empty()).then_some(url)
}
