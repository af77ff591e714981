use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::languages::LanguageNames;
use crate::models::{Counts, Facet, ResolvedSample};

/// How samples are partitioned into report pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// One page per engine/provider.
    Provider,
    /// One page per language code, all engines combined, one entry per voice.
    #[default]
    Language,
}

impl GroupMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Language => "language",
        }
    }
}

/// One report page worth of samples.
#[derive(Debug, Clone)]
pub struct Group {
    /// Raw grouping key (provider name or language code).
    pub key: String,
    /// Display label: language name, or the provider name as written.
    pub label: String,
    /// Output file name, e.g. `azure.html`.
    pub page: String,
    pub entries: Vec<ResolvedSample>,
}

impl Group {
    pub fn stats(&self) -> Counts {
        Counts::tally(&self.entries)
    }

    /// Found/total per engine slug, sorted by slug.
    pub fn engine_facets(&self) -> Vec<Facet> {
        facets(&self.entries, |s| Some(engine_slug(&s.record.engine)))
    }

    /// Found/total per lowercased gender, sorted. Blank genders are left out.
    pub fn gender_facets(&self) -> Vec<Facet> {
        facets(&self.entries, |s| {
            let g = s.record.gender.trim().to_lowercase();
            (!g.is_empty()).then_some(g)
        })
    }

    /// Distinct engine slugs in this group, sorted.
    pub fn engines(&self) -> Vec<String> {
        self.engine_facets().into_iter().map(|f| f.name).collect()
    }
}

fn facets<F>(entries: &[ResolvedSample], key: F) -> Vec<Facet>
where
    F: Fn(&ResolvedSample) -> Option<String>,
{
    let mut by_name: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for s in entries {
        if let Some(name) = key(s) {
            let slot = by_name.entry(name).or_default();
            slot.0 += 1;
            if s.present() {
                slot.1 += 1;
            }
        }
    }
    by_name
        .into_iter()
        .map(|(name, (total, found))| Facet { name, total, found })
        .collect()
}

/// Normalized engine name used for sorting, chips and styling.
pub fn engine_slug(engine: &str) -> String {
    let slug = engine.trim().to_lowercase();
    if slug.is_empty() { "unknown".to_string() } else { slug }
}

/// Voice name with repeated leading `<lang>-` prefixes removed.
///
/// `af-ZA-af-ZA-AdriNeural` in `af-ZA` → `AdriNeural`. Blank → `(no voice)`.
pub fn clean_voice(lang: &str, voice: &str) -> String {
    let code = lang.trim();
    let prefix = format!("{}-", code).to_lowercase();
    let mut v = voice.trim();
    if !code.is_empty() {
        while v.len() >= prefix.len()
            && v.is_char_boundary(prefix.len())
            && v[..prefix.len()].to_lowercase() == prefix
        {
            v = &v[prefix.len()..];
        }
    }
    if v.is_empty() {
        "(no voice)".to_string()
    } else {
        v.to_string()
    }
}

pub fn group(mode: GroupMode, samples: Vec<ResolvedSample>, names: &LanguageNames) -> Vec<Group> {
    match mode {
        GroupMode::Provider => group_by_provider(samples),
        GroupMode::Language => group_by_language(samples, names),
    }
}

/// One group per raw provider string, entries sorted by (lang, voice, filename).
pub fn group_by_provider(samples: Vec<ResolvedSample>) -> Vec<Group> {
    let groups = partition(samples, |s| s.record.engine.clone())
        .into_iter()
        .map(|(key, mut entries)| {
            entries.sort_by(|a, b| {
                let (a, b) = (&a.record, &b.record);
                (&a.lang, &a.voice, &a.filename).cmp(&(&b.lang, &b.voice, &b.filename))
            });
            Group {
                page: page_name(&key.to_lowercase()),
                label: key.clone(),
                key,
                entries,
            }
        })
        .collect();
    assign_pages(groups)
}

/// One group per language code, deduplicated by voice, sorted by (engine, voice).
pub fn group_by_language(samples: Vec<ResolvedSample>, names: &LanguageNames) -> Vec<Group> {
    let groups = partition(samples, |s| {
        if s.record.lang.is_empty() {
            "unknown".to_string()
        } else {
            s.record.lang.clone()
        }
    })
    .into_iter()
    .map(|(key, entries)| {
        let mut entries = dedupe_by_voice(entries);
        entries.sort_by(|a, b| {
            let ka = (engine_slug(&a.record.engine), &a.record.voice);
            let kb = (engine_slug(&b.record.engine), &b.record.voice);
            ka.cmp(&kb)
        });
        Group {
            page: page_name(&key),
            label: names.display_name(&key),
            key,
            entries,
        }
    })
    .collect();
    assign_pages(groups)
}

/// Keep one entry per non-empty voice key, preferring one whose audio resolved.
///
/// Ties fall to engine slug, then voice, then filename. Entries without a voice are all kept.
pub fn dedupe_by_voice(mut entries: Vec<ResolvedSample>) -> Vec<ResolvedSample> {
    entries.sort_by(|a, b| {
        let ka = (!a.present(), engine_slug(&a.record.engine), &a.record.voice, &a.record.filename);
        let kb = (!b.present(), engine_slug(&b.record.engine), &b.record.voice, &b.record.filename);
        ka.cmp(&kb)
    });

    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| {
            let key = e.record.voice.trim().to_lowercase();
            key.is_empty() || seen.insert(key)
        })
        .collect()
}

/// Split samples by key; groups ordered by lowercased key, then raw key.
fn partition<F>(samples: Vec<ResolvedSample>, key: F) -> Vec<(String, Vec<ResolvedSample>)>
where
    F: Fn(&ResolvedSample) -> String,
{
    let mut by_key: BTreeMap<String, Vec<ResolvedSample>> = BTreeMap::new();
    for s in samples {
        by_key.entry(key(&s)).or_default().push(s);
    }
    let mut groups: Vec<_> = by_key.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    groups
}

/// `<stem>.html` with characters that are unsafe in file names replaced by `_`.
pub fn page_name(stem: &str) -> String {
    let safe: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let safe = if safe.is_empty() || safe.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        safe
    };
    format!("{}.html", safe)
}

/// Make page names unique and keep clear of `index.html`.
///
/// Later groups that collide get `-2`, `-3`, ... before the extension.
pub fn assign_pages(mut groups: Vec<Group>) -> Vec<Group> {
    let mut taken: HashSet<String> = HashSet::from(["index.html".to_string()]);
    for g in &mut groups {
        let original = g.page.clone();
        if taken.insert(original.to_lowercase()) {
            continue;
        }
        let stem = original.trim_end_matches(".html");
        let mut n = 2;
        let unique = loop {
            let candidate = format!("{}-{}.html", stem, n);
            if taken.insert(candidate.to_lowercase()) {
                break candidate;
            }
            n += 1;
        };
        log::warn!(
            "Group \"{}\" would be written to {}; using {} instead",
            g.key, original, unique
        );
        g.page = unique;
    }
    groups
}
