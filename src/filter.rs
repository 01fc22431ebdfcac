use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use tracing::warn;

use crate::parser::days::Weekday;

static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(monday|tuesday|wednesday|thursday|friday)").unwrap()
});

/// Major full name -> index abbreviation ("computer science" -> "cse").
/// Loaded once at startup and only read afterwards.
#[derive(Debug, Default, Clone)]
pub struct MajorAbbreviations {
    map: HashMap<String, String>,
}

impl MajorAbbreviations {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read major mapping {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid major mapping {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let map = raw
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Ok(Self { map })
    }

    /// Abbreviation for a major name, or the name itself when unmapped.
    /// Always lowercase, matching the indexed `major` field.
    pub fn resolve(&self, major: &str) -> String {
        let key = major.trim().to_lowercase();
        match self.map.get(&key) {
            Some(abv) => abv.to_lowercase(),
            None => key,
        }
    }
}

/// Build the search filter expression for a level and a set of majors.
///
/// `level ge 300 and level lt 400 and (major eq 'cse' or major eq 'math')`
///
/// A level that is not a number, or too large to bound, drops the level
/// clause only.
pub fn build_filter(
    level: Option<&str>,
    majors: &[String],
    abbreviations: &MajorAbbreviations,
) -> Option<String> {
    let mut clauses = Vec::new();

    if let Some(raw) = level {
        match raw.trim().parse::<u32>() {
            Ok(n) => match n.checked_add(100) {
                Some(upper) => clauses.push(format!("level ge {} and level lt {}", n, upper)),
                None => warn!("Ignoring out-of-range level filter {:?}", raw),
            },
            Err(_) => warn!("Ignoring non-numeric level filter {:?}", raw),
        }
    }

    let major_terms: Vec<String> = majors
        .iter()
        .filter(|m| !m.trim().is_empty())
        .map(|m| format!("major eq '{}'", abbreviations.resolve(m).replace('\'', "''")))
        .collect();
    if !major_terms.is_empty() {
        clauses.push(format!("({})", major_terms.join(" or ")));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" and "))
    }
}

/// Capitalize lowercase weekday names so free-text queries use the same
/// vocabulary as the schedule output ("Meeting Days: Tuesday"). Matches
/// inside longer words too, so "mondays" becomes "Mondays".
pub fn normalize_weekdays(query: &str) -> String {
    WEEKDAY_RE
        .replace_all(query, |caps: &Captures| {
            Weekday::ALL
                .iter()
                .find(|d| d.name().eq_ignore_ascii_case(&caps[1]))
                .map(|d| d.name().to_string())
                .unwrap_or_else(|| caps[1].to_string())
        })
        .into_owned()
}
