use tracing::debug;

use super::document::TableElement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub code: String,
    pub level: String,
    pub name: String,
    pub area_of_knowledge: Option<String>,
    pub remainder: String,
}

impl Course {
    /// Catalog anchor key: "CSE" + "142" -> "cse142".
    pub fn lookup_key(&self) -> String {
        normalize_key(&format!("{}{}", self.code, self.level))
    }
}

pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Decode a course-header table by string position:
/// 0 = "CODE LEVEL", 1 = name, 2 = area of knowledge when parenthesized,
/// 3.. = remainder.
pub fn extract(table: &TableElement) -> Course {
    let mut course = Course {
        code: String::new(),
        level: String::new(),
        name: String::new(),
        area_of_knowledge: None,
        remainder: String::new(),
    };

    for (i, s) in table.strings.iter().enumerate() {
        match i {
            0 => {
                let mut tokens = s.split_whitespace();
                course.code = tokens.next().unwrap_or_default().to_string();
                course.level = tokens.next().unwrap_or_default().to_string();
                if table.strings.len() < 2 {
                    // Header packed into one cell: "CSE 142  Computer Programming I".
                    course.name = tokens.collect::<Vec<_>>().join(" ");
                }
            }
            1 => course.name = s.clone(),
            2 => {
                if s.starts_with('(') {
                    course.area_of_knowledge = Some(s.clone());
                }
            }
            _ => {
                if !course.remainder.is_empty() {
                    course.remainder.push(' ');
                }
                course.remainder.push_str(s);
            }
        }
    }

    if course.code.is_empty() || course.level.is_empty() {
        debug!(
            "Degraded course header in table {}: {:?}",
            table.index, table.strings
        );
    }

    course
}
