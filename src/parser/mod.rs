pub mod assemble;
pub mod catalog;
pub mod course;
pub mod days;
pub mod document;
pub mod section;
pub mod tables;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use catalog::Catalog;
use document::Document;
use tables::CourseBlock;

pub const DEFAULT_TERM: &str = "Spring 2024";

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Term shown in the banner line ("Spring 2024 Time Schedule").
    pub term: String,
    pub header_tables: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            term: DEFAULT_TERM.to_string(),
            header_tables: tables::HEADER_TABLES,
        }
    }
}

/// One unit handed to the indexer. Schedules have no pagination, so offset
/// and page number are always 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputBlock {
    pub offset: usize,
    pub page_num: usize,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decoded schedule before rendering.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub header: Vec<String>,
    pub blocks: Vec<CourseBlock>,
}

/// Three-step pipeline: tables → tagged records → course blocks.
/// None when the page has no `<h2>` header at all.
pub fn decode(doc: &Document, opts: &ParseOptions) -> Option<Schedule> {
    let header = doc.header_runs()?;
    let tables = doc.tables();
    let records = tables::classify_tables(&tables, opts.header_tables);
    let blocks = tables::group_courses(records);
    debug!(
        "Decoded {} tables into {} course blocks",
        tables.len(),
        blocks.len()
    );
    Some(Schedule { header, blocks })
}

pub fn render(
    schedule: Option<&Schedule>,
    catalog: Option<&Catalog>,
    opts: &ParseOptions,
) -> OutputBlock {
    let text = match schedule {
        Some(s) => assemble::assemble(&opts.term, &s.header, &s.blocks, catalog),
        None => String::new(),
    };
    OutputBlock {
        offset: 0,
        page_num: 0,
        text,
    }
}

/// Parse an already-loaded schedule (and optional catalog) into its block
/// sequence. The work runs when the iterator is first polled.
pub fn parse_markup(
    schedule: String,
    catalog: Option<String>,
    opts: ParseOptions,
) -> impl Iterator<Item = OutputBlock> {
    std::iter::once_with(move || {
        let doc = Document::parse(&schedule);
        let catalog = catalog.as_deref().map(Catalog::parse);
        let decoded = decode(&doc, &opts);
        if decoded.is_none() {
            debug!("No header element found, emitting empty block");
        }
        render(decoded.as_ref(), catalog.as_ref(), &opts)
    })
}

/// Read a schedule file and its optional catalog. Only a failure reading the
/// schedule itself is an error; an unreadable catalog is treated as absent.
pub fn parse_file(
    path: &Path,
    catalog_path: Option<&Path>,
    opts: &ParseOptions,
) -> Result<impl Iterator<Item = OutputBlock>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = catalog_path.and_then(load_catalog_text);
    Ok(parse_markup(document::decode(&bytes), catalog, opts.clone()))
}

fn load_catalog_text(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(document::decode(&bytes)),
        Err(e) => {
            warn!("Skipping catalog {}: {}", path.display(), e);
            None
        }
    }
}

// ── Tests ──
