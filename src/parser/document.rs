use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static PRE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre").unwrap());
static H2_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[name]").unwrap());

/// One `<table>` from the schedule, flattened.
#[derive(Debug, Clone)]
pub struct TableElement {
    pub index: usize,
    /// A nested `<pre>` marks a section record; its absence marks a course header.
    pub has_pre: bool,
    pub strings: Vec<String>,
    pub text: String,
}

/// A loaded markup tree. Lives for one parse call and is never shared.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Text runs of the first `<h2>`, or None when the page has no header.
    pub fn header_runs(&self) -> Option<Vec<String>> {
        self.html
            .select(&H2_SEL)
            .next()
            .map(|h2| stripped_strings(&h2))
    }

    pub fn tables(&self) -> Vec<TableElement> {
        self.html
            .select(&TABLE_SEL)
            .enumerate()
            .map(|(index, table)| TableElement {
                index,
                has_pre: table.select(&PRE_SEL).next().is_some(),
                strings: stripped_strings(&table),
                text: table.text().collect(),
            })
            .collect()
    }

    /// `(name attribute, text)` for every named anchor. Empty anchors borrow
    /// the text of their next sibling element.
    pub fn named_anchors(&self) -> Vec<(String, String)> {
        self.html
            .select(&ANCHOR_SEL)
            .filter_map(|a| {
                let name = a.value().attr("name")?.to_string();
                let mut text = collapse_runs(&a);
                if text.is_empty() {
                    text = a
                        .next_siblings()
                        .find_map(ElementRef::wrap)
                        .map(|el| collapse_runs(&el))
                        .unwrap_or_default();
                }
                Some((name, text))
            })
            .collect()
    }
}

/// Decode raw bytes as UTF-8, falling back to Windows-1252 for legacy pages.
pub fn decode(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (cow, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            cow.into_owned()
        }
    };
    text.trim_start_matches('\u{feff}').to_string()
}

fn stripped_strings(el: &ElementRef) -> Vec<String> {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// All text under `el` on one line, runs separated by a single space.
fn collapse_runs(el: &ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
