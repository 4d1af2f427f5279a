use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::CoreError;

/// Turns report HTML into a downloadable artifact on disk.
///
/// The core never depends on a concrete rendering technology: a headless
/// browser service, a local PDF engine or a plain HTML writer all fit here.
/// The caller owns the returned file and removes it after delivery.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Human-readable name (for logs/errors).
    fn name(&self) -> &str;

    /// MIME type of the files this renderer produces.
    fn content_type(&self) -> &str;

    /// File extension (without the dot) of the produced artifact.
    fn extension(&self) -> &str;

    /// Render `html` into a new file named after `file_stem`.
    async fn render_to_file(&self, html: &str, file_stem: &str) -> Result<PathBuf, CoreError>;
}
