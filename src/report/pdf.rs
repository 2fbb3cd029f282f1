//! PDF listing report.
//!
//! Rendering happens in two passes. [`layout`] flows the title block and one
//! label/value block per record into pages of positioned [`Op`]s, breaking
//! pages whenever the next line would cross the bottom margin. [`render`]
//! then draws those ops with `printpdf`'s builtin Helvetica fonts. All
//! coordinates are millimetres from the bottom-left corner of an A4 page.

use chrono::{DateTime, Local};
use printpdf::{
    Actions, BuiltinFont, Color, HighlightingMode, IndirectFontRef, Line, LinkAnnotation, Mm,
    PdfDocument, PdfLayerReference, Point, Rect, Rgb,
};

use crate::error::AppError;
use crate::models::criteria::SearchCriteria;
use crate::models::job::{COLUMNS, JobRecord, hyperlink_target};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const BOTTOM_MARGIN: f32 = 15.0;
const LABEL_WIDTH: f32 = 40.0;
const VALUE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN - LABEL_WIDTH;
const LINE_HEIGHT: f32 = 6.0;

const TITLE: &str = "Naukri.com Job Listings";
const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Regular,
    Bold,
}

/// One positioned drawing operation. `x`/`y` locate the text baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        x: f32,
        y: f32,
        size: f32,
        style: Style,
        text: String,
    },
    /// Underlined blue text with a clickable area over it.
    Link {
        x: f32,
        y: f32,
        size: f32,
        width: f32,
        text: String,
        url: String,
    },
    /// Grey horizontal separator.
    Rule { x1: f32, x2: f32, y: f32 },
}

impl Op {
    fn y(&self) -> f32 {
        match self {
            Op::Text { y, .. } | Op::Link { y, .. } | Op::Rule { y, .. } => *y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<Op>,
}

impl Page {
    /// Concatenated text of every text and link op, one per line.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } | Op::Link { text, .. } => Some(text.as_str()),
                Op::Rule { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lowest baseline on the page, if anything was drawn.
    pub fn lowest(&self) -> Option<f32> {
        self.ops.iter().map(Op::y).reduce(f32::min)
    }
}

/// Render the report to PDF bytes.
pub fn to_bytes(
    records: &[JobRecord],
    criteria: &SearchCriteria,
    generated_at: DateTime<Local>,
) -> Result<Vec<u8>, AppError> {
    render(&layout(records, criteria, generated_at))
}

/// Flow the report into pages.
pub fn layout(
    records: &[JobRecord],
    criteria: &SearchCriteria,
    generated_at: DateTime<Local>,
) -> Vec<Page> {
    let mut flow = Flow::new();

    flow.centered(TITLE, TITLE_SIZE, Style::Bold, 12.0);
    flow.centered(
        &format!("Job Title: {}", criteria.job_title),
        HEADING_SIZE,
        Style::Regular,
        10.0,
    );
    flow.centered(
        &format!("City: {}", criteria.location),
        HEADING_SIZE,
        Style::Regular,
        10.0,
    );
    flow.centered(
        &format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M")),
        HEADING_SIZE,
        Style::Regular,
        10.0,
    );
    flow.skip(5.0);

    // The last column is the job URL; only it is drawn as a link.
    let [labels @ .., url_label] = &COLUMNS;
    for record in records {
        let values = record.columns();
        let [fields @ .., hyperlink] = &values;
        for (column, value) in labels.iter().zip(fields) {
            flow.field(&format!("{column}:"), value);
        }
        let label = format!("{url_label}:");
        match hyperlink_target(hyperlink) {
            Some(url) => flow.link_field(&label, url),
            None => flow.field(&label, hyperlink),
        }
        flow.skip(1.0);
        flow.rule();
        flow.skip(5.0);
    }

    flow.pages
}

struct Flow {
    pages: Vec<Page>,
    /// Top edge of the next line.
    y: f32,
}

impl Flow {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Start a new page unless `height` more millimetres fit above the
    /// bottom margin.
    fn reserve(&mut self, height: f32) {
        if self.y - height < BOTTOM_MARGIN {
            self.pages.push(Page::default());
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn skip(&mut self, height: f32) {
        self.y -= height;
    }

    fn push(&mut self, op: Op) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn baseline(&self, line_height: f32, size: f32) -> f32 {
        self.y - (line_height + size * PT_TO_MM) / 2.0
    }

    fn centered(&mut self, text: &str, size: f32, style: Style, line_height: f32) {
        self.reserve(line_height);
        let text = fold(text);
        let width = text_width(&text, size, style).min(PAGE_WIDTH - 2.0 * MARGIN);
        self.push(Op::Text {
            x: (PAGE_WIDTH - width) / 2.0,
            y: self.baseline(line_height, size),
            size,
            style,
            text,
        });
        self.y -= line_height;
    }

    fn label(&mut self, label: &str) {
        self.push(Op::Text {
            x: MARGIN,
            y: self.baseline(LINE_HEIGHT, BODY_SIZE),
            size: BODY_SIZE,
            style: Style::Bold,
            text: label.to_string(),
        });
    }

    /// Bold label beside a value wrapped into the value column.
    fn field(&mut self, label: &str, value: &str) {
        let lines = wrap(&fold(value), VALUE_WIDTH, BODY_SIZE, Style::Regular);
        for (i, line) in lines.into_iter().enumerate() {
            self.reserve(LINE_HEIGHT);
            if i == 0 {
                self.label(label);
            }
            if !line.is_empty() {
                self.push(Op::Text {
                    x: MARGIN + LABEL_WIDTH,
                    y: self.baseline(LINE_HEIGHT, BODY_SIZE),
                    size: BODY_SIZE,
                    style: Style::Regular,
                    text: line,
                });
            }
            self.y -= LINE_HEIGHT;
        }
    }

    /// Label on its own line, then the URL as a link below it.
    fn link_field(&mut self, label: &str, url: &str) {
        self.reserve(LINE_HEIGHT);
        self.label(label);
        self.y -= LINE_HEIGHT;

        for chunk in wrap(&fold(url), VALUE_WIDTH, BODY_SIZE, Style::Regular) {
            self.reserve(LINE_HEIGHT);
            self.push(Op::Link {
                x: MARGIN + LABEL_WIDTH,
                y: self.baseline(LINE_HEIGHT, BODY_SIZE),
                size: BODY_SIZE,
                width: text_width(&chunk, BODY_SIZE, Style::Regular),
                text: chunk,
                url: url.to_string(),
            });
            self.y -= LINE_HEIGHT;
        }
    }

    fn rule(&mut self) {
        if self.y < BOTTOM_MARGIN {
            return;
        }
        self.push(Op::Rule {
            x1: MARGIN,
            x2: PAGE_WIDTH - MARGIN,
            y: self.y,
        });
    }
}

/// Map text onto what the builtin fonts can draw.
pub fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | ' '..='~' => out.push(c),
            '\t' | '\r' | '\u{a0}' => out.push(' '),
            '₹' => out.push_str("Rs."),
            '–' | '—' | '‐' | '‑' | '−' | '•' | '·' => out.push('-'),
            '‘' | '’' | '′' => out.push('\''),
            '“' | '”' | '″' => out.push('"'),
            '…' => out.push_str("..."),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap. Blank input lines are kept as empty lines and words
/// wider than `width` are broken between characters.
fn wrap(text: &str, width: f32, size: f32, style: Style) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if text_width(&candidate, size, style) <= width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for c in word.chars() {
                line.push(c);
                if text_width(&line, size, style) > width {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(c);
                }
            }
        }
        lines.push(line);
    }
    lines
}

fn text_width(text: &str, size: f32, style: Style) -> f32 {
    let units: u32 = text.chars().map(glyph_width).sum();
    let scale = match style {
        Style::Regular => 1.0,
        Style::Bold => 1.06,
    };
    units as f32 / 1000.0 * size * PT_TO_MM * scale
}

/// Helvetica advance widths for printable ASCII, in 1/1000 em.
fn glyph_width(c: char) -> u32 {
    const WIDTHS: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
    ];
    (c as u32)
        .checked_sub(32)
        .and_then(|i| WIDTHS.get(i as usize))
        .map_or(556, |w| u32::from(*w))
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Draw laid-out pages into a PDF document.
pub fn render(pages: &[Page]) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        for op in &page.ops {
            draw(&layer, op, &regular, &bold);
        }
    }

    Ok(doc.save_to_bytes()?)
}

fn draw(layer: &PdfLayerReference, op: &Op, regular: &IndirectFontRef, bold: &IndirectFontRef) {
    match op {
        Op::Text {
            x,
            y,
            size,
            style,
            text,
        } => {
            let font = match style {
                Style::Regular => regular,
                Style::Bold => bold,
            };
            layer.set_fill_color(rgb(0.0, 0.0, 0.0));
            layer.use_text(text.as_str(), *size, Mm(*x), Mm(*y), font);
        }
        Op::Link {
            x,
            y,
            size,
            width,
            text,
            url,
        } => {
            layer.set_fill_color(rgb(0.0, 0.0, 1.0));
            layer.use_text(text.as_str(), *size, Mm(*x), Mm(*y), regular);

            layer.set_outline_color(rgb(0.0, 0.0, 1.0));
            layer.set_outline_thickness(0.5);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x), Mm(*y - 0.8)), false),
                    (Point::new(Mm(*x + *width), Mm(*y - 0.8)), false),
                ],
                is_closed: false,
            });

            layer.add_link_annotation(LinkAnnotation::new(
                Rect::new(
                    Mm(*x),
                    Mm(*y - 1.5),
                    Mm(*x + *width),
                    Mm(*y + *size * PT_TO_MM),
                ),
                None,
                None,
                Actions::uri(url.clone()),
                Some(HighlightingMode::Invert),
            ));
        }
        Op::Rule { x1, x2, y } => {
            layer.set_outline_color(rgb(0.78, 0.78, 0.78));
            layer.set_outline_thickness(0.5);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), Mm(*y)), false),
                    (Point::new(Mm(*x2), Mm(*y)), false),
                ],
                is_closed: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::criteria::Location;
    use crate::models::job::{JobDetails, SENTINEL};
    use pretty_assertions::assert_eq;

    fn criteria() -> SearchCriteria {
        SearchCriteria::new("Data Scientist", Location::City("Pune".into()), 10).unwrap()
    }

    fn record(id: u32) -> JobRecord {
        let mut details = JobDetails::empty(format!("https://www.naukri.com/job-listings-{id}"));
        details.title = "Data Scientist".to_string();
        details.salary = "₹ 12–18 Lacs P.A.".to_string();
        details.description = "Build models\n- ship them\n\nWork with the platform team on \
             feature pipelines, experiment tracking and model serving."
            .to_string();
        JobRecord { id, details }
    }

    #[test]
    fn test_title_block() {
        let pages = layout(&[], &criteria(), Local::now());
        assert_eq!(pages.len(), 1);

        let text = pages[0].text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Naukri.com Job Listings");
        assert_eq!(lines[1], "Job Title: Data Scientist");
        assert_eq!(lines[2], "City: Pune");
        assert!(lines[3].starts_with("Generated: "));
        assert!(matches!(
            pages[0].ops[0],
            Op::Text {
                style: Style::Bold,
                ..
            }
        ));
    }

    #[test]
    fn test_record_block() {
        let pages = layout(&[record(1)], &criteria(), Local::now());
        let text = pages[0].text();

        for column in COLUMNS {
            assert!(text.contains(&format!("{column}:")), "missing label {column}");
        }
        assert!(text.contains("Rs. 12-18 Lacs P.A."));
        assert!(
            pages[0]
                .ops
                .iter()
                .any(|op| matches!(op, Op::Rule { .. }))
        );

        let links: Vec<&str> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Link { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(links, vec!["https://www.naukri.com/job-listings-1"]);
    }

    #[test]
    fn test_flows_onto_new_pages_above_bottom_margin() {
        let records: Vec<JobRecord> = (1..=6).map(record).collect();
        let pages = layout(&records, &criteria(), Local::now());

        assert!(pages.len() > 1);
        for page in &pages {
            let lowest = page.lowest().unwrap();
            assert!(lowest >= BOTTOM_MARGIN, "drew below margin at {lowest}");
        }
        let links = pages
            .iter()
            .flat_map(|p| &p.ops)
            .filter(|op| matches!(op, Op::Link { .. }))
            .count();
        assert_eq!(links, 6);
    }

    #[test]
    fn test_formula_text_in_other_fields_stays_plain() {
        let mut r = record(1);
        r.details.description =
            "Apply via =HYPERLINK(\"https://elsewhere.test\", \"here\") and more details"
                .to_string();
        let pages = layout(&[r], &criteria(), Local::now());

        let text: String = pages.iter().map(Page::text).collect();
        assert!(text.contains("and more details"));
        let links: Vec<&str> = pages
            .iter()
            .flat_map(|p| &p.ops)
            .filter_map(|op| match op {
                Op::Link { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(links, vec!["https://www.naukri.com/job-listings-1"]);
    }

    #[test]
    fn test_missing_url_is_plain_sentinel() {
        let record = JobRecord {
            id: 1,
            details: JobDetails::empty(SENTINEL),
        };
        let pages = layout(&[record], &criteria(), Local::now());
        assert!(
            !pages[0]
                .ops
                .iter()
                .any(|op| matches!(op, Op::Link { .. }))
        );
    }

    #[test]
    fn test_wrap_stays_in_value_column() {
        let long = "analytics ".repeat(40);
        let lines = wrap(long.trim(), VALUE_WIDTH, BODY_SIZE, Style::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, BODY_SIZE, Style::Regular) <= VALUE_WIDTH);
        }

        let unbroken = "x".repeat(200);
        let lines = wrap(&unbroken, VALUE_WIDTH, BODY_SIZE, Style::Regular);
        assert_eq!(lines.concat(), unbroken);
    }

    #[test]
    fn test_wrap_keeps_blank_lines() {
        let lines = wrap("Duties:\n\nBuild", VALUE_WIDTH, BODY_SIZE, Style::Regular);
        assert_eq!(lines, vec!["Duties:", "", "Build"]);
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("₹ 5–8 Lacs • Remote"), "Rs. 5-8 Lacs - Remote");
        assert_eq!(fold("“Fast” it’s…"), "\"Fast\" it's...");
        assert_eq!(fold("Zürich"), "Z?rich");
    }

    #[test]
    fn test_to_bytes() {
        let bytes = to_bytes(&[record(1), record(2)], &criteria(), Local::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
