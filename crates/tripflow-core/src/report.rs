//! Report rendering: a pure transform from `(ordered job names, results)` to
//! a console transcript and a self-contained HTML document.
//!
//! Section order always follows the declared workflow order. The console
//! header line instead enumerates the results table's own iteration order;
//! the two orderings intentionally differ.

use std::fmt::Write as _;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::job::{JobName, JobResult, ResultsTable};

/// Fixed body for workflow steps with no recorded result.
pub const MISSING_STEP_BODY: &str = "No results found for this step.";

static UPPERCASE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[A-Z]+").expect("invalid uppercase-run regex"));

/// Split a camel-case job name for display: a space is inserted before every
/// run of uppercase letters, then the result is trimmed.
///
/// `planGoals` -> `plan Goals`, `createBudget` -> `create Budget`,
/// `x` -> `x`. Locale-free; non-letter characters pass through unchanged.
pub fn titleize(job_name: &str) -> String {
    UPPERCASE_RUN
        .replace_all(job_name, " $0")
        .trim()
        .to_string()
}

/// Render a job result as display text.
///
/// Text results pass through unchanged. Structured results become
/// pretty-printed JSON with 2-space indentation and keys in the order they
/// were set. Reported lengths are counted in Unicode scalar values
/// (`str::chars().count()`).
pub fn stringify_result(result: &JobResult) -> String {
    match result {
        JobResult::Text(text) => text.clone(),
        JobResult::Structured(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// One rendered report section, derived per job name at render time.
#[derive(Debug, Clone)]
pub struct ReportSection {
    pub title: String,
    pub body: String,
    pub present: bool,
    /// Body length in Unicode scalar values; `None` for warning sections.
    pub length: Option<usize>,
}

/// A fully rendered report: ordered sections plus the header key listing.
///
/// Constructed once per run, serialized to HTML, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    /// Keys present in the results table, in the table's own iteration
    /// order. Section order follows the declared workflow instead.
    pub header_keys: Vec<JobName>,
    pub sections: Vec<ReportSection>,
    pub generated_at: Option<String>,
}

impl Report {
    pub fn with_generated_at(mut self, label: impl Into<String>) -> Self {
        self.generated_at = Some(label.into());
        self
    }

    fn header_line(&self) -> String {
        if self.header_keys.is_empty() {
            "Results object contains keys: [ ]".to_string()
        } else {
            format!(
                "Results object contains keys: [ {} ]",
                self.header_keys.join(", ")
            )
        }
    }

    /// Render the console transcript: the header key line followed by
    /// per-section blocks mirroring the HTML structure.
    pub fn console_text(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}", self.header_line());
        let _ = writeln!(output);

        for section in &self.sections {
            if section.present {
                let length = section.length.unwrap_or(0);
                let _ = writeln!(output, "{} (length: {} characters)", section.title, length);
                let _ = writeln!(output, "{}", section.body);
            } else {
                let _ = writeln!(output, "WARNING: No {} results found for this step.", section.title);
            }
            let _ = writeln!(output);
        }

        output
    }

    /// Render a standalone HTML document with an embedded style block and no
    /// external assets.
    pub fn to_html(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "<!DOCTYPE html>");
        let _ = writeln!(output, "<html lang=\"en\">");
        let _ = writeln!(output, "<head>");
        let _ = writeln!(output, "<meta charset=\"utf-8\">");
        let _ = writeln!(output, "<title>{}</title>", escape_html(&self.title));
        let _ = writeln!(output, "<style>{}</style>", STYLE_BLOCK);
        let _ = writeln!(output, "</head>");
        let _ = writeln!(output, "<body>");
        let _ = writeln!(output, "<h1>{}</h1>", escape_html(&self.title));
        let _ = writeln!(output, "<p class=\"keys\">{}</p>", escape_html(&self.header_line()));

        for section in &self.sections {
            if section.present {
                let length = section.length.unwrap_or(0);
                let _ = writeln!(
                    output,
                    "<h2>{} <span class=\"length\">(length: {} characters)</span></h2>",
                    escape_html(&section.title),
                    length
                );
                let _ = writeln!(output, "<pre>{}</pre>", escape_html(&section.body));
            } else {
                let _ = writeln!(
                    output,
                    "<h2 class=\"missing\">{}</h2>",
                    escape_html(&section.title)
                );
                let _ = writeln!(
                    output,
                    "<p class=\"warning\">{}</p>",
                    escape_html(&section.body)
                );
            }
        }

        if let Some(generated_at) = &self.generated_at {
            let _ = writeln!(
                output,
                "<p class=\"generated\">Generated on: {}</p>",
                escape_html(generated_at)
            );
        }

        let _ = writeln!(output, "</body>");
        let _ = writeln!(output, "</html>");
        output
    }
}

const STYLE_BLOCK: &str = "\
body { font-family: Georgia, serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
h1 { border-bottom: 2px solid #145da0; padding-bottom: 0.3rem; }
h2 { color: #145da0; margin-bottom: 0.2rem; }
h2.missing { color: #8a6d00; }
.keys { color: #666; font-style: italic; }
.length { color: #888; font-size: 0.7em; font-weight: normal; }
pre { background: #f5f5f2; border: 1px solid #ddd; border-radius: 6px; padding: 0.8rem; white-space: pre-wrap; word-wrap: break-word; }
.warning { background: #fff6da; border: 1px solid #e0c368; border-radius: 6px; padding: 0.8rem; }
.generated { color: #999; font-size: 0.85em; margin-top: 2rem; }";

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Deterministic transform of workflow results into a [`Report`].
///
/// Never fails for missing or malformed individual results: a job name with
/// no entry degrades to a warning section.
pub struct ReportRenderer {
    title: String,
}

impl ReportRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn render(&self, ordered_job_names: &[JobName], results: &ResultsTable) -> Report {
        let header_keys: Vec<JobName> = results.keys().cloned().collect();
        let mut sections = Vec::with_capacity(ordered_job_names.len());

        for name in ordered_job_names {
            let title = titleize(name);
            match results.get(name) {
                Some(outcome) => {
                    let body = stringify_result(&outcome.report_value());
                    let length = body.chars().count();
                    sections.push(ReportSection {
                        title,
                        body,
                        present: true,
                        length: Some(length),
                    });
                }
                None => {
                    warn!(job = %name, "no results recorded for workflow step");
                    sections.push(ReportSection {
                        title,
                        body: MISSING_STEP_BODY.to_string(),
                        present: false,
                        length: None,
                    });
                }
            }
        }

        Report {
            title: self.title.clone(),
            header_keys,
            sections,
            generated_at: None,
        }
    }
}
