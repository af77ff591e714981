use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::grouping::{self, Group, GroupMode};
use crate::languages::LanguageNames;
use crate::models::{ResolvedSample, SampleRecord};
use crate::records;
use crate::scanner::{self, AudioIndex, Resolver, ScanError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No CSV files found under {}", root.display())]
    NoSources { root: PathBuf },
    #[error("Audio scan failed: {0}")]
    Scan(#[from] ScanError),
}

/// Counters for the operator: what was read and what was skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub audio_files: usize,
    pub duplicate_basenames: usize,
    pub csv_files: usize,
    pub failed_sources: usize,
    pub rows: usize,
    pub skipped_rows: usize,
}

/// Grouped, resolved samples ready to render.
#[derive(Debug)]
pub struct Report {
    pub groups: Vec<Group>,
    pub index: AudioIndex,
    pub stats: RunStats,
}

/// Resolve every record against the index exactly once.
pub fn resolve_all(resolver: &Resolver<'_>, records: Vec<SampleRecord>) -> Vec<ResolvedSample> {
    records
        .into_iter()
        .map(|record| {
            let resolution = resolver.resolve(&record.filename);
            ResolvedSample::new(record, resolution)
        })
        .collect()
}

/// Index audio, load every sheet, resolve, and group.
///
/// Fails only when the root can't be scanned or holds no CSV files.
pub fn build(root: &Path, mode: GroupMode, names: &LanguageNames) -> Result<Report, PipelineError> {
    let index = scanner::index_audio(root)?;

    let csvs = records::find_csvs(root);
    if csvs.is_empty() {
        return Err(PipelineError::NoSources { root: root.to_path_buf() });
    }
    log::info!("Found {} CSV file(s)", csvs.len());

    let loaded = records::load_all(root, &csvs);
    log::info!("Read {} row(s) total", loaded.records.len());

    let stats = RunStats {
        audio_files: index.len(),
        duplicate_basenames: index.duplicates().len(),
        csv_files: loaded.sources,
        failed_sources: loaded.failed_sources,
        rows: loaded.records.len(),
        skipped_rows: loaded.skipped_rows,
    };

    let resolver = Resolver::new(root, &index);
    let samples = resolve_all(&resolver, loaded.records);
    let groups = grouping::group(mode, samples, names);

    Ok(Report { groups, index, stats })
}
