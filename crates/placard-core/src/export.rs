//! Export of the finished design.

use crate::canvas::Canvas;
use crate::storage::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Pdf,
    Json,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Bytes produced by an exporter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Suggested file name, e.g. `poster.png`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.format.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export format '{0}' is not supported by this exporter")]
    Unsupported(ExportFormat),
    #[error("failed to serialize design: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("export failed: {0}")]
    Failed(String),
}

/// Renders a canvas into a file format.
///
/// Implementations copy whatever they need from `canvas` before returning;
/// the future must not borrow it. Selection handles are never part of the
/// canvas, so exporters do not need to filter them out.
pub trait ExportService: Send + Sync {
    fn export(&self, canvas: &Canvas, format: ExportFormat) -> BoxFuture<'_, Result<ExportArtifact, ExportError>>;
}

/// Exports the design document itself. Raster and PDF output need a renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ExportService for JsonExporter {
    fn export(&self, canvas: &Canvas, format: ExportFormat) -> BoxFuture<'_, Result<ExportArtifact, ExportError>> {
        let result = match format {
            ExportFormat::Json => canvas
                .to_json()
                .map(|json| ExportArtifact {
                    format,
                    bytes: json.into_bytes(),
                })
                .map_err(ExportError::from),
            other => Err(ExportError::Unsupported(other)),
        };
        Box::pin(async move { result })
    }
}
