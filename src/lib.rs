pub mod config;
pub mod grouping;
pub mod languages;
pub mod models;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod scanner;

/// Audio file extensions we index, in resolver tie-break order.
/// `acc` is a common misspelling of `aac` that shows up in sample sheets and on disk.
pub const AUDIO_EXTENSIONS: &[&str] = &["aac", "acc", "m4a"];

/// Application name for XDG paths
pub const APP_NAME: &str = "voxreport";
