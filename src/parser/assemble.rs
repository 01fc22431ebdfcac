use std::sync::LazyLock;

use regex::Regex;

use super::catalog::Catalog;
use super::course::Course;
use super::days;
use super::section::Section;
use super::tables::{CourseBlock, CourseContext};

static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

const INTRO: &str = "Below is a list of all classes for this major and their associated sections:";

/// Render the whole schedule in document order, then collapse horizontal
/// whitespace.
pub fn assemble(
    term: &str,
    header: &[String],
    blocks: &[CourseBlock],
    catalog: Option<&Catalog>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} Time Schedule\n\n", term));
    out.push_str(&header.join(" "));
    out.push_str("\n\n");
    out.push_str(INTRO);
    out.push_str("\n\n");

    for block in blocks {
        match &block.context {
            CourseContext::Known(course) => {
                out.push_str(&course_line(course, catalog));
            }
            CourseContext::Unknown => out.push_str("Class: Unknown"),
        }
        out.push('\n');
        for section in &block.sections {
            out.push_str(&section_line(section));
            out.push('\n');
        }
    }

    normalize_whitespace(&out)
}

pub fn course_line(course: &Course, catalog: Option<&Catalog>) -> String {
    let mut line = format!(
        "Class: {}, Level: {}, Name: {}, Area of Knowledge: {}",
        course.code,
        course.level,
        course.name,
        course.area_of_knowledge.as_deref().unwrap_or("None"),
    );
    if !course.remainder.is_empty() {
        line.push_str(", ");
        line.push_str(&course.remainder);
    }
    if let Some(desc) = catalog.and_then(|c| c.description(course)) {
        line.push_str(", Description: ");
        line.push_str(desc);
    }
    line
}

/// One output line per section. Line breaks inside the `<pre>` record are
/// folded into single spaces.
pub fn section_line(section: &Section) -> String {
    let mut line = format!("{} Section:", section.kind.label());
    if section.meetings.is_empty() {
        line.push(' ');
        line.push_str(section.text.trim());
        return single_line(&line);
    }
    if !section.leading.is_empty() {
        line.push(' ');
        line.push_str(&section.leading);
    }
    for m in &section.meetings {
        line.push_str(&format!(
            " Meeting Days: {} Meeting Time: {}",
            days::join_names(&m.days),
            m.fragment()
        ));
    }
    single_line(&line)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse runs of spaces/tabs to one space. Newlines are untouched.
pub fn normalize_whitespace(text: &str) -> String {
    HSPACE_RE.replace_all(text, " ").into_owned()
}
