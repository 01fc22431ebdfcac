mod filter;
mod ingest;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use parser::ParseOptions;

#[derive(Parser)]
#[command(name = "sched_parser", about = "Flatten time schedule pages into indexable text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one schedule page and print its text block
    Parse {
        /// Schedule HTML file
        file: PathBuf,
        /// Course catalog HTML for the same subject area
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// Term for the banner line
        #[arg(short, long, default_value = parser::DEFAULT_TERM)]
        term: String,
        /// Number of leading navigation tables to skip
        #[arg(long, default_value_t = parser::tables::HEADER_TABLES)]
        header_tables: usize,
        /// Print the block as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Parse every schedule page in a directory
    Ingest {
        /// Directory of schedule HTML files
        dir: PathBuf,
        /// Output directory for <name>.txt files and manifest.json
        #[arg(short, long)]
        out: PathBuf,
        /// Directory of catalog pages, matched to schedules by file name
        #[arg(long)]
        catalog_dir: Option<PathBuf>,
        /// Term for the banner line
        #[arg(short, long, default_value = parser::DEFAULT_TERM)]
        term: String,
        /// Number of leading navigation tables to skip
        #[arg(long, default_value_t = parser::tables::HEADER_TABLES)]
        header_tables: usize,
    },
    /// Build a search filter expression from a level and majors
    Filter {
        /// Course level (e.g. 300 for 300-level classes)
        #[arg(short, long)]
        level: Option<String>,
        /// Major name or abbreviation (repeatable)
        #[arg(short, long = "major")]
        majors: Vec<String>,
        /// Major name -> abbreviation JSON mapping
        #[arg(long, default_value = "major_abv.json")]
        majors_file: PathBuf,
        /// Free-text query to normalize alongside the filter
        #[arg(short, long)]
        query: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result: anyhow::Result<()> = match cli.command {
        Commands::Parse {
            file,
            catalog,
            term,
            header_tables,
            json,
        } => {
            let opts = ParseOptions {
                term,
                header_tables,
            };
            let blocks = parser::parse_file(&file, catalog.as_deref(), &opts)?;
            for block in blocks {
                if json {
                    println!("{}", serde_json::to_string(&block)?);
                } else {
                    print!("{}", block.text);
                }
            }
            Ok(())
        }
        Commands::Ingest {
            dir,
            out,
            catalog_dir,
            term,
            header_tables,
        } => {
            let opts = ParseOptions {
                term,
                header_tables,
            };
            let stats = ingest::ingest_dir(&dir, &out, catalog_dir.as_deref(), &opts)?;
            println!(
                "Done: {} documents ({} ok, {} empty, {} errors).",
                stats.total, stats.ok, stats.empty, stats.errors
            );
            Ok(())
        }
        Commands::Filter {
            level,
            majors,
            majors_file,
            query,
        } => {
            let abbreviations = if majors_file.exists() {
                filter::MajorAbbreviations::load(&majors_file)?
            } else {
                tracing::warn!(
                    "Major mapping {} not found, using names as given",
                    majors_file.display()
                );
                filter::MajorAbbreviations::default()
            };
            let expr = filter::build_filter(level.as_deref(), &majors, &abbreviations);
            println!("filter: {}", expr.as_deref().unwrap_or("(none)"));
            if let Some(q) = query {
                println!("query:  {}", filter::normalize_weekdays(&q));
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
