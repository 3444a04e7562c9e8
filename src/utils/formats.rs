use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use crate::utils::TranscodeError;

/// Target formats the transcoder can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    PNG,
    JPEG,
    WebP,
}

/// One row of the format table: display name, canonical extension first.
struct FormatEntry {
    format: ImageFormat,
    name: &'static str,
    extensions: &'static [&'static str],
}

/// The single extension/format lookup shared by both batch modes.
const FORMAT_TABLE: [FormatEntry; 3] = [
    FormatEntry { format: ImageFormat::PNG, name: "PNG", extensions: &["png"] },
    FormatEntry { format: ImageFormat::JPEG, name: "JPEG", extensions: &["jpg", "jpeg"] },
    FormatEntry { format: ImageFormat::WebP, name: "WEBP", extensions: &["webp"] },
];

impl ImageFormat {
    /// All encodable formats, in table order.
    pub const ALL: [ImageFormat; 3] = [Self::PNG, Self::JPEG, Self::WebP];

    fn entry(&self) -> &'static FormatEntry {
        // The table holds every variant exactly once.
        match self {
            Self::PNG => &FORMAT_TABLE[0],
            Self::JPEG => &FORMAT_TABLE[1],
            Self::WebP => &FORMAT_TABLE[2],
        }
    }

    /// Upper-case display name ("PNG", "JPEG", "WEBP")
    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &'static [&'static str] {
        self.entry().extensions
    }

    /// Extension used for output files (`png`, `jpg`, `webp`)
    pub fn canonical_extension(&self) -> &'static str {
        self.extensions()[0]
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    /// Look up a format by file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        FORMAT_TABLE
            .iter()
            .find(|entry| entry.extensions.contains(&ext.as_str()))
            .map(|entry| entry.format)
    }

    /// Whether the format can carry an alpha channel
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, Self::JPEG)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFormat {
    type Err = TranscodeError;

    /// Accepts a format name or extension, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.');
        FORMAT_TABLE
            .iter()
            .find(|entry| {
                entry.name.eq_ignore_ascii_case(wanted)
                    || entry.extensions.iter().any(|ext| ext.eq_ignore_ascii_case(wanted))
            })
            .map(|entry| entry.format)
            .ok_or_else(|| TranscodeError::unsupported_format(s.to_string()))
    }
}

/// Output path for `source` re-encoded as `format` inside `dir`:
/// the source's base name with the format's canonical extension.
pub fn output_path_for(dir: &Path, source: &Path, format: ImageFormat) -> std::path::PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    dir.join(format!("{stem}.{}", format.canonical_extension()))
}
