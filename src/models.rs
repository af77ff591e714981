use serde::Serialize;

/// One data row from a sample sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    /// Language code, `"unknown"` when the sheet left it blank.
    pub lang: String,
    /// Engine / provider name, `"unknown"` when blank.
    pub engine: String,
    pub voice: String,
    pub gender: String,
    /// Audio filename as cited in the sheet. May be empty.
    pub filename: String,

    /// Sheet path relative to the root, `/`-separated.
    pub source_csv: String,
    /// 1-based row; the header is row 1.
    pub row: usize,
}

/// Outcome of matching a cited filename against the audio on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Root-relative path of the matched file, or the original filename when unresolved.
    pub path: String,
    pub present: bool,
}

impl Resolution {
    pub fn found(path: impl Into<String>) -> Self {
        Self { path: path.into(), present: true }
    }

    pub fn missing(filename: impl Into<String>) -> Self {
        Self { path: filename.into(), present: false }
    }
}

/// A record paired with its resolution. Built once per run and not mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSample {
    pub record: SampleRecord,
    pub resolution: Resolution,
}

impl ResolvedSample {
    pub fn new(record: SampleRecord, resolution: Resolution) -> Self {
        Self { record, resolution }
    }

    pub fn present(&self) -> bool {
        self.resolution.present
    }
}

/// Total / found / missing tallies for a group or facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub found: usize,
    pub missing: usize,
}

impl Counts {
    pub fn tally<'a>(samples: impl IntoIterator<Item = &'a ResolvedSample>) -> Self {
        let mut counts = Counts::default();
        for s in samples {
            counts.total += 1;
            if s.present() {
                counts.found += 1;
            } else {
                counts.missing += 1;
            }
        }
        counts
    }
}

/// Per-engine or per-gender breakdown shown as a filter chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub name: String,
    pub total: usize,
    pub found: usize,
}
