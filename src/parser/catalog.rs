use std::collections::HashMap;

use tracing::debug;

use super::course::{normalize_key, Course};
use super::document::Document;

/// Course descriptions keyed by normalized anchor name ("cse142").
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn from_document(doc: &Document) -> Self {
        let mut entries = HashMap::new();
        for (name, text) in doc.named_anchors() {
            let key = normalize_key(&name);
            if key.is_empty() || text.is_empty() {
                continue;
            }
            // First anchor wins; later duplicates are navigation repeats.
            entries.entry(key).or_insert(text);
        }
        debug!("Catalog loaded with {} entries", entries.len());
        Self { entries }
    }

    pub fn parse(markup: &str) -> Self {
        Self::from_document(&Document::parse(markup))
    }

    pub fn description(&self, course: &Course) -> Option<&str> {
        let found = self.entries.get(&course.lookup_key()).map(String::as_str);
        if found.is_none() {
            debug!("No catalog entry for {} {}", course.code, course.level);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, level: &str) -> Course {
        Course {
            code: code.into(),
            level: level.into(),
            name: String::new(),
            area_of_knowledge: None,
            remainder: String::new(),
        }
    }

    #[test]
    fn lookup_by_code_and_level() {
        let catalog = Catalog::parse(
            "<a name=\"cse142\">Basic programming concepts</a>\
             <a name=\"CSE 143\">Continuation of 142</a>",
        );
        assert_eq!(
            catalog.description(&course("CSE", "142")),
            Some("Basic programming concepts")
        );
        assert_eq!(
            catalog.description(&course("cse", "143")),
            Some("Continuation of 142")
        );
    }

    #[test]
    fn miss_is_none() {
        let catalog = Catalog::parse("<a name=\"cse142\">Basic</a>");
        assert_eq!(catalog.description(&course("MATH", "124")), None);
    }

    #[test]
    fn blank_anchors_ignored() {
        let catalog = Catalog::parse("<a name=\"\">x</a><a name=\"top\"></a>");
        assert!(catalog.entries.is_empty());
    }

    #[test]
    fn fixture_catalog() {
        let html = std::fs::read_to_string("tests/fixtures/cse_catalog.html").unwrap();
        let catalog = Catalog::parse(&html);
        let desc = catalog.description(&course("CSE", "143")).unwrap();
        assert!(desc.starts_with("CSE 143 Computer Programming II"));
    }
}
