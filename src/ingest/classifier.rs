//! Extension-keyed selection of the engine's update endpoint.

/// Ingestion profile chosen from a document's file extension.
///
/// Selects which update endpoint accepts the document: structured JSON, CSV
/// rows, or generic content extraction for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionProfile {
    Json,
    Csv,
    Extract,
}

impl IngestionProfile {
    /// Update endpoint path on the engine for this profile.
    pub fn endpoint(&self) -> &'static str {
        match self {
            IngestionProfile::Json => "/update/json",
            IngestionProfile::Csv => "/update/csv",
            IngestionProfile::Extract => "/update/extract",
        }
    }
}

/// Classify a file name by its extension, case-insensitively.
///
/// The extension is the substring after the last `.`; a name without one is
/// treated as its own extension and falls through to content extraction, as
/// does anything not recognized.
pub fn classify(file_name: &str) -> IngestionProfile {
    let extension = match file_name.rfind('.') {
        Some(idx) => &file_name[idx + 1..],
        None => file_name,
    };
    match extension.to_ascii_lowercase().as_str() {
        "json" => IngestionProfile::Json,
        "csv" => IngestionProfile::Csv,
        _ => IngestionProfile::Extract,
    }
}
