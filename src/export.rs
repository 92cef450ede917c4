//! Export formats and file naming.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::content::ContentCategory;
use crate::error::QrResult;

/// Product prefix of exported file names.
pub const FILE_PREFIX: &str = "qrchitect";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// `qrchitect-<Category>-<millis>.<ext>`
pub fn export_file_name(category: ContentCategory, format: ExportFormat, timestamp_millis: i64) -> String {
    format!(
        "{}-{}-{}.{}",
        FILE_PREFIX,
        category.display_name(),
        timestamp_millis,
        format.extension()
    )
}

/// An exported image, named and ready to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write into `dir` (created if missing), returning the full path.
    pub fn write_to(&self, dir: &Path) -> QrResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}
