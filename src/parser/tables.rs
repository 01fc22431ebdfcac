use tracing::debug;

use super::course::{self, Course};
use super::document::TableElement;
use super::section::{self, Section};

/// Leading tables hold page navigation and the column legend, not schedule rows.
pub const HEADER_TABLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    CourseHeader,
    SectionRecord,
}

pub fn role(table: &TableElement) -> TableRole {
    if table.has_pre {
        TableRole::SectionRecord
    } else {
        TableRole::CourseHeader
    }
}

#[derive(Debug, Clone)]
pub enum TableRecord {
    NewCourse(Course),
    AttachedSection(Section),
}

/// Course a group of sections belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseContext {
    Known(Course),
    /// Sections seen before any course header.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct CourseBlock {
    pub context: CourseContext,
    pub sections: Vec<Section>,
}

/// Classify and decode every table after the first `skip`.
pub fn classify_tables(tables: &[TableElement], skip: usize) -> Vec<TableRecord> {
    tables
        .iter()
        .skip(skip)
        .map(|t| match role(t) {
            TableRole::CourseHeader => TableRecord::NewCourse(course::extract(t)),
            TableRole::SectionRecord => TableRecord::AttachedSection(section::extract(t)),
        })
        .collect()
}

/// Group the record stream into course blocks. A section with no preceding
/// course opens an `Unknown` block.
pub fn group_courses(records: Vec<TableRecord>) -> Vec<CourseBlock> {
    let mut blocks: Vec<CourseBlock> = Vec::new();

    for record in records {
        match record {
            TableRecord::NewCourse(c) => blocks.push(CourseBlock {
                context: CourseContext::Known(c),
                sections: Vec::new(),
            }),
            TableRecord::AttachedSection(s) => match blocks.last_mut() {
                Some(block) => block.sections.push(s),
                None => {
                    debug!("Section before any course header, attaching to unknown course");
                    blocks.push(CourseBlock {
                        context: CourseContext::Unknown,
                        sections: vec![s],
                    });
                }
            },
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::section::SectionKind;

    fn table(index: usize, has_pre: bool, strings: &[&str]) -> TableElement {
        TableElement {
            index,
            has_pre,
            strings: strings.iter().map(|s| s.to_string()).collect(),
            text: strings.join(" "),
        }
    }

    fn nav() -> Vec<TableElement> {
        (0..HEADER_TABLES)
            .map(|i| table(i, false, &["Nav", "links"]))
            .collect()
    }

    #[test]
    fn header_tables_skipped() {
        let records = classify_tables(&nav(), HEADER_TABLES);
        assert!(records.is_empty());
    }

    #[test]
    fn pre_marks_section() {
        assert_eq!(role(&table(0, true, &[])), TableRole::SectionRecord);
        assert_eq!(role(&table(0, false, &[])), TableRole::CourseHeader);
    }

    #[test]
    fn sections_attach_to_latest_course() {
        let mut tables = nav();
        tables.push(table(3, false, &["CSE 142", "COMPUTER PRGRMNG I"]));
        tables.push(table(4, true, &["12345 A 4 MWF 1030-1120"]));
        tables.push(table(5, true, &["12346 AA QZ TTh 830-920"]));
        tables.push(table(6, false, &["CSE 143", "COMPUTER PRGRMNG II"]));
        tables.push(table(7, true, &["12400 A 5 MWF 130-220"]));

        let blocks = group_courses(classify_tables(&tables, HEADER_TABLES));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].sections.len(), 2);
        assert_eq!(blocks[0].sections[1].kind, SectionKind::Quiz);
        assert_eq!(blocks[1].sections.len(), 1);
        match &blocks[1].context {
            CourseContext::Known(c) => assert_eq!(c.level, "143"),
            CourseContext::Unknown => panic!("expected CSE 143"),
        }
    }

    #[test]
    fn orphan_section_gets_unknown_course() {
        let mut tables = nav();
        tables.push(table(3, true, &["12345 A 4 MWF 1030-1120"]));
        tables.push(table(4, false, &["CSE 142", "COMPUTER PRGRMNG I"]));

        let blocks = group_courses(classify_tables(&tables, HEADER_TABLES));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].context, CourseContext::Unknown);
        assert_eq!(blocks[0].sections.len(), 1);
        assert!(blocks[1].sections.is_empty());
    }

    #[test]
    fn course_without_sections_kept() {
        let mut tables = nav();
        tables.push(table(3, false, &["CSE 190", "SPECIAL TOPICS"]));
        let blocks = group_courses(classify_tables(&tables, HEADER_TABLES));
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].sections.is_empty());
    }
}
