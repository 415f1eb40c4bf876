mod error;
mod export;
mod parser;
mod settings;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};

use crate::error::{ParseFailure, StructuralWarning};
use crate::parser::RawDocument;
use crate::settings::Settings;
use crate::store::{EducationRow, Session, SummaryRow};

#[derive(Parser)]
#[command(name = "lattes_extractor", about = "Summarize Lattes CV XML exports (CNPq)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summary table of every curriculum, exported to CSV
    Summary {
        /// XML files or directories containing them
        paths: Vec<PathBuf>,
        /// CSV destination (default: resumo_lattes.csv, or LATTES_SUMMARY_CSV)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Skip writing the CSV
        #[arg(long, conflicts_with = "csv")]
        no_csv: bool,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// List selection labels and their keys
    Select {
        paths: Vec<PathBuf>,
    },
    /// Academic education of one curriculum
    Education {
        paths: Vec<PathBuf>,
        /// Label or key from `select` (default: first curriculum)
        #[arg(short, long)]
        select: Option<String>,
        /// Also write the table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Summary { paths, csv, no_csv, format } => {
            let Some(session) = load_session(&paths, &settings)? else {
                return Ok(());
            };
            let rows: Vec<SummaryRow> = session.summaries().to_vec();
            if rows.is_empty() {
                println!("No curriculum could be parsed.");
                return Ok(());
            }
            match format {
                Format::Table => print_summary(&rows),
                Format::Json => println!("{}", export::to_json(&rows)?),
            }
            if !no_csv {
                let path = csv.unwrap_or_else(|| settings.summary_csv.clone());
                export::write_csv(&path, &rows)?;
                println!("\nSummary CSV: {}", path.display());
            }
            Ok(())
        }
        Commands::Select { paths } => {
            let Some(session) = load_session(&paths, &settings)? else {
                return Ok(());
            };
            for s in session.selections() {
                println!("{}\t{}", s.key, s.label);
            }
            Ok(())
        }
        Commands::Education { paths, select, csv, format } => {
            let Some(session) = load_session(&paths, &settings)? else {
                return Ok(());
            };
            let (cv, rows, warning) = session.education(select.as_deref())?;
            if let Some(w) = warning {
                warn!("{}", w);
            }
            let label = cv.summary.label(&settings.missing_name_label);
            match format {
                Format::Json => println!("{}", export::to_json(&rows)?),
                Format::Table if rows.is_empty() => {
                    println!("No academic education found for {}.", label)
                }
                Format::Table => {
                    println!("Academic education: {}\n", label);
                    print_education(&rows);
                }
            }
            if let Some(path) = csv {
                export::write_csv(&path, &rows)?;
                println!("\nEducation CSV: {}", path.display());
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

struct BatchReport {
    received: usize,
    parsed: usize,
    unreadable: Vec<String>,
    failures: Vec<ParseFailure>,
    warnings: Vec<StructuralWarning>,
}

impl BatchReport {
    // Failures and warnings were already logged as they happened.
    fn print(&self) {
        println!(
            "Parsed {} of {} file(s) ({} unreadable, {} failed, {} warning(s)).\n",
            self.parsed,
            self.received,
            self.unreadable.len(),
            self.failures.len(),
            self.warnings.len(),
        );
    }
}

/// Read, sanitize and parse every input, one at a time. A document that cannot
/// be read or parsed is reported and left out; the rest of the batch carries on.
/// Returns `None` when there was nothing to load.
fn load_session(paths: &[PathBuf], settings: &Settings) -> Result<Option<Session>> {
    let files = collect_inputs(paths)?;
    if files.is_empty() {
        println!("Provide at least one Lattes CV XML file to start.");
        return Ok(None);
    }
    println!("{} file(s) loaded. Processing...", files.len());

    let (session, report) = process_documents(&files, settings)?;
    report.print();
    Ok(Some(session))
}

fn process_documents(files: &[PathBuf], settings: &Settings) -> Result<(Session, BatchReport)> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = if settings.progress && files.len() > 1 {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut session = Session::new(settings.missing_name_label.clone());
    let mut report = BatchReport {
        received: files.len(),
        parsed: 0,
        unreadable: Vec::new(),
        failures: Vec::new(),
        warnings: Vec::new(),
    };

    for path in files {
        let doc = match RawDocument::from_path(path) {
            Ok(doc) => doc,
            Err(e) => {
                error!(file = %path.display(), "{:#}", e);
                report.unreadable.push(path.display().to_string());
                pb.inc(1);
                continue;
            }
        };
        pb.set_message(doc.filename.clone());
        match parser::process_document(&doc) {
            Ok(cv) => {
                report.parsed += 1;
                report.warnings.extend(cv.warnings.iter().cloned());
                if let Some((_, dup)) = session.insert(cv) {
                    report.warnings.push(dup);
                }
            }
            Err(e) => {
                error!(file = %e.filename, "{}", e.source);
                report.failures.push(e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(curricula = session.len(), failed = report.failures.len(), "batch done");
    Ok((session, report))
}

/// Expand directories into their `.xml` files (sorted); plain paths pass through.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("Failed to list {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_xml(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

fn print_summary(rows: &[SummaryRow]) {
    println!(
        "{:>3} | {:<32} | {:<16} | {:<4} | {:<20} | {:<10} | {:<24}",
        "#", "Nome completo", "ID Lattes", "Nac.", "Cidade de nascimento", "Sexo", "Arquivo"
    );
    println!("{}", "-".repeat(128));

    for (i, r) in rows.iter().enumerate() {
        println!(
            "{:>3} | {:<32} | {:<16} | {:<4} | {:<20} | {:<10} | {:<24}",
            i + 1,
            truncate(&r.full_name, 32),
            r.id_lattes,
            r.nationality,
            truncate(&r.birth_city, 20),
            r.sex,
            truncate(&r.filename, 24),
        );
    }

    println!("\n{} curricula", rows.len());
}

fn print_education(rows: &[EducationRow]) {
    println!(
        "{:<22} | {:<28} | {:<28} | {:<12} | {:>6} | {:>6} | {:<5} | {:<20}",
        "Nível", "Nome do curso", "Instituição", "Status", "Início", "Fim", "Bolsa", "Agência"
    );
    println!("{}", "-".repeat(144));

    for r in rows {
        println!(
            "{:<22} | {:<28} | {:<28} | {:<12} | {:>6} | {:>6} | {:<5} | {:<20}",
            truncate(&r.level, 22),
            truncate(&r.course, 28),
            truncate(&r.institution, 28),
            truncate(&r.status, 12),
            r.start_year,
            r.end_year,
            r.scholarship,
            truncate(&r.funding_agency, 20),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
