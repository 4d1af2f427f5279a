use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::errors::CoreError;
use super::traits::ReportRenderer;

/// Writes the report HTML as-is. Useful offline, in tests, and as the input
/// for an external print-to-PDF step.
pub struct HtmlFileRenderer {
    output_dir: PathBuf,
}

impl HtmlFileRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl ReportRenderer for HtmlFileRenderer {
    fn name(&self) -> &str {
        "HtmlFile"
    }

    fn content_type(&self) -> &str {
        "text/html; charset=utf-8"
    }

    fn extension(&self) -> &str {
        "html"
    }

    async fn render_to_file(&self, html: &str, file_stem: &str) -> Result<PathBuf, CoreError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{file_stem}.{}", self.extension()));
        tokio::fs::write(&path, html).await?;
        debug!(path = %path.display(), bytes = html.len(), "Rendered report HTML");
        Ok(path)
    }
}
