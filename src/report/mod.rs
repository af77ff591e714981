pub mod html;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::grouping::{Group, GroupMode};
use crate::models::Counts;

pub use html::{escape_html, render_index, render_language_page, render_provider_page};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What the index page (and `--summary-json`) says about one group page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub key: String,
    pub label: String,
    pub page: String,
    pub counts: Counts,
    pub engines: Vec<String>,
}

impl PageSummary {
    pub fn from_group(group: &Group) -> Self {
        Self {
            key: group.key.clone(),
            label: group.label.clone(),
            page: group.page.clone(),
            counts: group.stats(),
            engines: group.engines(),
        }
    }
}

/// Render one group page for the given mode.
pub fn render_group(group: &Group, mode: GroupMode, generated_at: &str) -> String {
    match mode {
        GroupMode::Provider => render_provider_page(group, generated_at),
        GroupMode::Language => render_language_page(group, generated_at),
    }
}

/// Write one page per group plus `index.html` into `root`.
pub fn write_report(
    root: &Path,
    groups: &[Group],
    mode: GroupMode,
    duplicates: &BTreeMap<String, Vec<String>>,
    generated_at: &str,
) -> Result<Vec<PageSummary>, ReportError> {
    let mut summaries = Vec::with_capacity(groups.len());

    for group in groups {
        let summary = PageSummary::from_group(group);
        write_page(root, &group.page, &render_group(group, mode, generated_at))?;
        log::info!(
            "Wrote {}: {} rows, {} ok, {} missing",
            group.page, summary.counts.total, summary.counts.found, summary.counts.missing
        );
        summaries.push(summary);
    }

    write_page(
        root,
        "index.html",
        &render_index(&summaries, mode, duplicates, generated_at),
    )?;
    log::info!("Wrote index.html");

    Ok(summaries)
}

fn write_page(root: &Path, name: &str, contents: &str) -> Result<(), ReportError> {
    let path = root.join(name);
    std::fs::write(&path, contents).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resolution, ResolvedSample, SampleRecord};

    fn group(key: &str, page: &str) -> Group {
        let record = SampleRecord {
            lang: "en-US".into(),
            engine: key.into(),
            voice: "Jane".into(),
            gender: "Female".into(),
            filename: "jane.aac".into(),
            source_csv: "voices.csv".into(),
            row: 2,
        };
        Group {
            key: key.into(),
            label: key.into(),
            page: page.into(),
            entries: vec![ResolvedSample::new(record, Resolution::found("jane.aac"))],
        }
    }

    #[test]
    fn writes_group_pages_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let groups = vec![group("Azure", "azure.html"), group("aws", "aws.html")];

        let summaries =
            write_report(dir.path(), &groups, GroupMode::Provider, &BTreeMap::new(), "now").unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].page, "azure.html");
        assert_eq!(summaries[0].counts, Counts { total: 1, found: 1, missing: 0 });
        assert!(dir.path().join("azure.html").is_file());
        assert!(dir.path().join("aws.html").is_file());

        let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("href='azure.html'"));
        assert!(index.contains("href='aws.html'"));
    }

    #[test]
    fn write_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("nope");
        let err = write_report(
            &missing_dir,
            &[group("aws", "aws.html")],
            GroupMode::Provider,
            &BTreeMap::new(),
            "now",
        )
        .unwrap_err();
        assert!(err.to_string().contains("aws.html"));
    }

    #[test]
    fn summary_serializes_to_json() {
        let s = PageSummary::from_group(&group("aws", "aws.html"));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["page"], "aws.html");
        assert_eq!(json["counts"]["found"], 1);
        assert_eq!(json["engines"][0], "aws");
    }
}
