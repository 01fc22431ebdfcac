use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::parser::{self, ParseOptions};

const CHUNK: usize = 64;
const MANIFEST: &str = "manifest.json";

/// Ingest stats returned after completion.
pub struct IngestStats {
    pub total: usize,
    pub ok: usize,
    pub empty: usize,
    pub errors: usize,
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
    source: String,
    output: Option<String>,
    status: &'static str,
    catalog: bool,
    bytes: usize,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Manifest {
    generated_at: DateTime<Utc>,
    term: String,
    documents: Vec<ManifestEntry>,
}

/// Parse every `*.html` schedule in `input`, writing one `<stem>.txt` per
/// document into `out`. A document that fails to load is recorded and skipped.
pub fn ingest_dir(
    input: &Path,
    out: &Path,
    catalog_dir: Option<&Path>,
    opts: &ParseOptions,
) -> Result<IngestStats> {
    let files = list_schedules(input)?;
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output dir {}", out.display()))?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut entries = Vec::with_capacity(files.len());
    for chunk in files.chunks(CHUNK) {
        let results: Vec<ManifestEntry> = chunk
            .par_iter()
            .map(|path| ingest_one(path, out, catalog_dir, opts))
            .collect();
        entries.extend(results);
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    let stats = IngestStats {
        total: entries.len(),
        ok: entries.iter().filter(|e| e.status == "ok").count(),
        empty: entries.iter().filter(|e| e.status == "empty").count(),
        errors: entries.iter().filter(|e| e.status == "error").count(),
    };

    let manifest = Manifest {
        generated_at: Utc::now(),
        term: opts.term.clone(),
        documents: entries,
    };
    let manifest_path = out.join(MANIFEST);
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    info!(
        "Ingested {} documents ({} ok, {} empty, {} errors)",
        stats.total, stats.ok, stats.empty, stats.errors
    );
    Ok(stats)
}

fn list_schedules(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input dir {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("html")))
        .collect();
    files.sort();
    Ok(files)
}

fn ingest_one(
    path: &Path,
    out: &Path,
    catalog_dir: Option<&Path>,
    opts: &ParseOptions,
) -> ManifestEntry {
    let source = path.display().to_string();
    let catalog = catalog_dir
        .zip(path.file_name())
        .map(|(dir, name)| dir.join(name))
        .filter(|p| p.is_file());

    let failed = |e: String| {
        warn!("Skipping {}: {}", source, e);
        ManifestEntry {
            source: source.clone(),
            output: None,
            status: "error",
            catalog: catalog.is_some(),
            bytes: 0,
            error: Some(e),
        }
    };

    let blocks = match parser::parse_file(path, catalog.as_deref(), opts) {
        Ok(blocks) => blocks,
        Err(e) => return failed(e.to_string()),
    };
    let text: String = blocks.map(|b| b.text).collect();

    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let target = out.join(format!("{}.txt", stem));
    if let Err(e) = std::fs::write(&target, &text) {
        return failed(format!("write {}: {}", target.display(), e));
    }

    ManifestEntry {
        source: source.clone(),
        output: Some(target.display().to_string()),
        status: if text.is_empty() { "empty" } else { "ok" },
        catalog: catalog.is_some(),
        bytes: text.len(),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingests_dir_and_skips_bad_documents() {
        let input = tempfile::tempdir().unwrap();
        let catalogs = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        std::fs::copy("tests/fixtures/cse.html", input.path().join("cse.html")).unwrap();
        std::fs::copy(
            "tests/fixtures/cse_catalog.html",
            catalogs.path().join("cse.html"),
        )
        .unwrap();
        std::fs::write(input.path().join("blank.html"), "<html><body></body></html>").unwrap();
        std::fs::write(input.path().join("notes.md"), "# not a schedule").unwrap();
        // A directory named like a schedule cannot be read as a file.
        std::fs::create_dir(input.path().join("broken.html")).unwrap();

        let stats = ingest_dir(
            input.path(),
            out.path(),
            Some(catalogs.path()),
            &ParseOptions::default(),
        )
        .unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.ok, 1);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.errors, 1);

        let text = std::fs::read_to_string(out.path().join("cse.txt")).unwrap();
        assert!(text.contains("Description: CSE 142 Computer Programming I"));
        assert_eq!(std::fs::read_to_string(out.path().join("blank.txt")).unwrap(), "");

        let manifest: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(out.path().join(MANIFEST)).unwrap(),
        )
        .unwrap();
        let docs = manifest["documents"].as_array().unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(manifest["term"], "Spring 2024");
        let broken = docs
            .iter()
            .find(|d| d["source"].as_str().unwrap().ends_with("broken.html"))
            .unwrap();
        assert_eq!(broken["status"], "error");
    }

    #[test]
    fn missing_input_dir_is_error() {
        let out = tempfile::tempdir().unwrap();
        let result = ingest_dir(
            Path::new("tests/fixtures/does-not-exist"),
            out.path(),
            None,
            &ParseOptions::default(),
        );
        assert!(result.is_err());
    }
}
