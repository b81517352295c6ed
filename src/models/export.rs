//! # Export Model
//!
//! Closed set of export formats plus the rendered artifact handed back to
//! transport layers. Formats carry their own MIME metadata so callers never
//! branch on the variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported task export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// iCalendar (RFC 5545)
    Ical,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Ical];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Ical => "ical",
        }
    }

    /// MIME content type for the rendered payload
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Ical => "text/calendar; charset=utf-8",
        }
    }

    /// File extension without the leading dot
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Ical => "ics",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "ical" => Ok(Self::Ical),
            _ => Err(format!("Invalid export format: {s}")),
        }
    }
}

/// Rendered export payload with the metadata a download response needs
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
