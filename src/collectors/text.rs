// Text cleanup for values read off the detail page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::models::job::SENTINEL;

static LINE_BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid regex"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[-–•]\s*").expect("valid regex"));
static REVIEWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+)\s*Reviews").expect("valid regex"));
static SKILL_TAG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("valid selector"));

const EDUCATION_LABEL: &str = "Education";

/// The value itself, or the sentinel when it is blank.
pub fn or_sentinel(value: impl Into<String>) -> String {
    let value = value.into();
    if value.trim().is_empty() {
        SENTINEL.to_string()
    } else {
        value
    }
}

/// Clean multi-line description text, keeping paragraph breaks and bullets.
///
/// Steps run in order: `<br>` tags become newlines, runs of blank lines
/// collapse to one, hyphen/en-dash/bullet glyphs (with any whitespace around
/// them) become `"\n- "`, then every line and the whole text are trimmed.
/// Idempotent, and blank input or output is the sentinel.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() || text == SENTINEL {
        return SENTINEL.to_string();
    }

    let text = LINE_BREAK_TAG.replace_all(text, "\n");
    let text = BLANK_LINE_RUN.replace_all(&text, "\n\n");
    let text = BULLET.replace_all(&text, "\n- ");

    let cleaned = text
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    or_sentinel(cleaned.trim())
}

/// Split header text like `"Acme Corp 3.9 Reviews"` into the company name
/// and its review score.
pub fn split_company_reviews(text: &str) -> (String, String) {
    match REVIEWS.captures(text) {
        Some(caps) => {
            let company = text.replacen(&caps[0], "", 1);
            (or_sentinel(company.trim()), caps[1].to_string())
        }
        None => (or_sentinel(text.trim()), SENTINEL.to_string()),
    }
}

/// Text of every skill tag in the key-skills markup, comma-joined.
pub fn parse_key_skills(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let skills: Vec<String> = fragment
        .select(&SKILL_TAG)
        .map(|tag| tag.text().collect::<String>().trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect();
    or_sentinel(skills.join(", "))
}

/// Drop the leading `Education` label from the education block.
pub fn strip_education_label(text: &str) -> String {
    let text = text.trim();
    let stripped = text
        .strip_prefix(EDUCATION_LABEL)
        .map_or(text, |rest| rest.trim_start_matches(':'));
    or_sentinel(stripped.trim())
}
