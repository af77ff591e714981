use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use voxreport::grouping::GroupMode;
use voxreport::pipeline::PipelineError;

/// Exit status when the root holds no CSV files.
const EXIT_NO_CSVS: u8 = 2;

#[derive(Parser)]
#[command(name = "voxreport", version, about = "Build HTML pages auditing TTS voice samples against the audio on disk")]
struct Cli {
    /// Folder holding the CSV sheets and audio files (defaults to config root, then the current directory)
    root: Option<PathBuf>,

    /// Group pages by language or by provider
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Run everything but don't write any pages
    #[arg(long)]
    dry_run: bool,

    /// Also write the per-page summary as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    #[value(alias = "lang")]
    Language,
    #[value(alias = "engine")]
    Provider,
}

impl ModeArg {
    fn mode(self) -> GroupMode {
        match self {
            Self::Language => GroupMode::Language,
            Self::Provider => GroupMode::Provider,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Load config file (optional, defaults if missing)
    let config = voxreport::config::AppConfig::load();

    // Resolve root: CLI > config > current directory
    let root = match cli.root.or(config.root.clone()) {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve root folder {}", root.display()))?;
    println!("Root folder: {}", root.display());

    let mode = cli.mode.map(ModeArg::mode).or(config.mode).unwrap_or_default();
    log::info!("Grouping by {}", mode.label());

    let names = voxreport::languages::LanguageNames::new(&config.languages);

    let report = match voxreport::pipeline::build(&root, mode, &names) {
        Ok(r) => r,
        Err(PipelineError::NoSources { root }) => {
            eprintln!("No CSV files found under {}.", root.display());
            return Ok(ExitCode::from(EXIT_NO_CSVS));
        }
        Err(e) => return Err(e).context("Report generation failed"),
    };

    let stats = &report.stats;
    println!(
        "Indexed {} audio file(s), {} duplicate basename(s)",
        stats.audio_files, stats.duplicate_basenames
    );
    println!(
        "Read {} row(s) from {} CSV file(s) ({} unreadable, {} malformed row(s) skipped)",
        stats.rows, stats.csv_files, stats.failed_sources, stats.skipped_rows
    );

    let summaries: Vec<voxreport::report::PageSummary> = if cli.dry_run {
        println!("DRY RUN — no pages will be written");
        report
            .groups
            .iter()
            .map(voxreport::report::PageSummary::from_group)
            .collect()
    } else {
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
        voxreport::report::write_report(
            &root,
            &report.groups,
            mode,
            report.index.duplicates(),
            &generated_at,
        )
        .context("Failed to write report pages")?
    };

    for s in &summaries {
        println!(
            "  {:<28} {:>5} rows {:>5} ok {:>5} missing",
            s.page, s.counts.total, s.counts.found, s.counts.missing
        );
    }
    if !cli.dry_run {
        println!("Wrote {} page(s) and index.html", summaries.len());
    }

    if let Some(path) = cli.summary_json {
        let json = serde_json::to_string_pretty(&summaries).context("Failed to serialize summary")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
