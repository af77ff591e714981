pub mod decode;

use crate::models::SampleRecord;
use crate::scanner::{relative_path, walk_files};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Logical sheet columns and the normalized header names accepted for each.
const LANG_HEADERS: &[&str] = &["lang", "language"];
const ENGINE_HEADERS: &[&str] = &["engine", "provider"];
const VOICE_HEADERS: &[&str] = &["voice"];
const GENDER_HEADERS: &[&str] = &["gender"];
const FILENAME_HEADERS: &[&str] = &["filename", "file"];

/// Records from one sheet plus the rows that could not be parsed.
#[derive(Debug, Default)]
pub struct SheetRows {
    pub records: Vec<SampleRecord>,
    pub skipped_rows: usize,
}

/// Everything loaded from all sheets under a root.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub records: Vec<SampleRecord>,
    pub sources: usize,
    pub failed_sources: usize,
    pub skipped_rows: usize,
}

/// Every `.csv` file under `root`, in sorted traversal order.
pub fn find_csvs(root: &Path) -> Vec<PathBuf> {
    walk_files(root)
        .filter(|e| crate::scanner::has_extension(e.path(), &["csv"]))
        .map(|e| e.into_path())
        .collect()
}

/// Column positions resolved from a header row.
#[derive(Debug, Default)]
struct Columns {
    lang: Option<usize>,
    engine: Option<usize>,
    voice: Option<usize>,
    gender: Option<usize>,
    filename: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        // Last matching column wins when a sheet repeats a field
        let find = |names: &[&str]| {
            normalized
                .iter()
                .rposition(|h| names.contains(&h.as_str()))
        };
        Columns {
            lang: find(LANG_HEADERS),
            engine: find(ENGINE_HEADERS),
            voice: find(VOICE_HEADERS),
            gender: find(GENDER_HEADERS),
            filename: find(FILENAME_HEADERS),
        }
    }
}

/// Lowercase and drop all whitespace: `" Voice Name "` → `"voicename"`.
fn normalize_header(h: &str) -> String {
    h.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn or_unknown(value: String) -> String {
    if value.is_empty() { "unknown".to_string() } else { value }
}

/// Parse sheet text into records. `source_csv` is stored as provenance.
///
/// Empty input (no header row) yields no records. Malformed rows are skipped
/// and counted.
pub fn parse_sheet(content: &str, source_csv: &str) -> SheetRows {
    let mut rows = SheetRows::default();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns = match reader.headers() {
        Ok(h) if !h.is_empty() => Columns::from_headers(h),
        Ok(_) => return rows,
        Err(e) => {
            log::warn!("{}: unreadable header row: {}", source_csv, e);
            return rows;
        }
    };

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("{}:{}: skipping malformed row: {}", source_csv, row, e);
                rows.skipped_rows += 1;
                continue;
            }
        };

        rows.records.push(SampleRecord {
            lang: or_unknown(field(&record, columns.lang)),
            engine: or_unknown(field(&record, columns.engine)),
            voice: field(&record, columns.voice),
            gender: field(&record, columns.gender),
            filename: field(&record, columns.filename),
            source_csv: source_csv.to_string(),
            row,
        });
    }

    rows
}

/// Read and parse one sheet file.
pub fn read_csv(path: &Path, root: &Path) -> Result<SheetRows, LoadError> {
    let bytes = std::fs::read(path)?;
    let content = decode::decode_text(&bytes);
    let source = relative_path(root, path).unwrap_or_else(|| path.display().to_string());
    Ok(parse_sheet(&content, &source))
}

/// Load every sheet. A sheet that cannot be read is logged and skipped.
pub fn load_all(root: &Path, csvs: &[PathBuf]) -> LoadSummary {
    let pb = ProgressBar::new(csvs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message("Reading sheets...");

    let mut summary = LoadSummary::default();
    for path in csvs {
        summary.sources += 1;
        match read_csv(path, root) {
            Ok(sheet) => {
                log::debug!("{}: {} row(s)", path.display(), sheet.records.len());
                summary.skipped_rows += sheet.skipped_rows;
                summary.records.extend(sheet.records);
            }
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                summary.failed_sources += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!(
        "Done: {} row(s), {} skipped, {} unreadable sheet(s)",
        summary.records.len(),
        summary.skipped_rows,
        summary.failed_sources
    ));

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn headers_are_case_and_space_insensitive() {
        let text = " LANG ,Engine,  Voice,GENDER , File Name\n\
                    en-US, azure , Jane ,Female, jane.aac \n";
        let rows = parse_sheet(text, "voices.csv");
        assert_eq!(rows.records.len(), 1);
        let r = &rows.records[0];
        assert_eq!(r.lang, "en-US");
        assert_eq!(r.engine, "azure");
        assert_eq!(r.voice, "Jane");
        assert_eq!(r.gender, "Female");
        assert_eq!(r.filename, "jane.aac");
        assert_eq!(r.source_csv, "voices.csv");
        assert_eq!(r.row, 2);
    }

    #[test]
    fn header_aliases() {
        let text = "language,provider,voice,gender,file\nfr-FR,gcp,Luc,Male,luc.m4a\n";
        let rows = parse_sheet(text, "a.csv");
        let r = &rows.records[0];
        assert_eq!(r.lang, "fr-FR");
        assert_eq!(r.engine, "gcp");
        assert_eq!(r.filename, "luc.m4a");
    }

    #[test]
    fn repeated_header_uses_last_column() {
        let text = "lang,engine,voice,filename,File Name\nen-US,azure,Jane,old.aac,jane.aac\n";
        let rows = parse_sheet(text, "a.csv");
        assert_eq!(rows.records[0].filename, "jane.aac");

        let text = "Lang,Language,voice\nen,en-GB,Ann\n";
        let rows = parse_sheet(text, "a.csv");
        assert_eq!(rows.records[0].lang, "en-GB");
    }

    #[test]
    fn blank_lang_and_engine_become_unknown() {
        let text = "lang,engine,voice,gender,filename\n, ,Jane,,\n";
        let r = &parse_sheet(text, "a.csv").records[0];
        assert_eq!(r.lang, "unknown");
        assert_eq!(r.engine, "unknown");
        assert_eq!(r.gender, "");
        assert_eq!(r.filename, "");
    }

    #[test]
    fn missing_columns_and_short_rows() {
        let text = "lang,voice,filename\nde-DE,Hans\nde-DE,Anna,anna.aac,extra\n";
        let rows = parse_sheet(text, "a.csv");
        assert_eq!(rows.records.len(), 2);
        assert_eq!(rows.records[0].engine, "unknown");
        assert_eq!(rows.records[0].filename, "");
        assert_eq!(rows.records[0].row, 2);
        assert_eq!(rows.records[1].filename, "anna.aac");
        assert_eq!(rows.records[1].row, 3);
    }

    #[test]
    fn empty_sheet_yields_nothing() {
        let rows = parse_sheet("", "empty.csv");
        assert!(rows.records.is_empty());
        assert_eq!(rows.skipped_rows, 0);
    }

    #[test]
    fn header_only_sheet_yields_nothing() {
        let rows = parse_sheet("lang,engine,voice,gender,filename\n", "h.csv");
        assert!(rows.records.is_empty());
    }

    #[test]
    fn read_csv_strips_bom_and_records_relative_source() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sheets")).unwrap();
        let path = root.join("sheets/voices.csv");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"LANG,ENGINE,VOICE,GENDER,FILENAME\nen-US,aws,Joanna,Female,joanna.aac\n");
        fs::write(&path, bytes).unwrap();

        let rows = read_csv(&path, root).unwrap();
        assert_eq!(rows.records.len(), 1);
        assert_eq!(rows.records[0].lang, "en-US");
        assert_eq!(rows.records[0].source_csv, "sheets/voices.csv");
    }

    #[test]
    fn find_csvs_is_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("z")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("z/b.csv"), "").unwrap();
        fs::write(root.join("a/c.CSV"), "").unwrap();
        fs::write(root.join("a/notes.txt"), "").unwrap();

        let found: Vec<String> = find_csvs(root)
            .iter()
            .map(|p| relative_path(root, p).unwrap())
            .collect();
        assert_eq!(found, vec!["a/c.CSV", "z/b.csv"]);
    }

    #[test]
    fn load_all_counts_unreadable_sources() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("ok.csv"),
            "lang,engine,voice,gender,filename\nen-US,aws,Matthew,Male,m.aac\n",
        )
        .unwrap();
        let csvs = vec![root.join("ok.csv"), root.join("gone.csv")];

        let summary = load_all(root, &csvs);
        assert_eq!(summary.sources, 2);
        assert_eq!(summary.failed_sources, 1);
        assert_eq!(summary.records.len(), 1);
    }
}
