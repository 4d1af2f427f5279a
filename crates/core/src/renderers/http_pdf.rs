use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::CoreError;
use super::traits::ReportRenderer;

/// Sends the report HTML to a headless-browser rendering service and stores
/// the PDF it answers with.
///
/// The endpoint receives `POST` with a `text/html` body and must reply with
/// the PDF bytes (status 2xx).
pub struct HttpPdfRenderer {
    client: Client,
    endpoint: String,
    output_dir: PathBuf,
}

impl HttpPdfRenderer {
    pub fn new(endpoint: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            // Page rendering in a headless browser can be slow for long reports.
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReportRenderer for HttpPdfRenderer {
    fn name(&self) -> &str {
        "HttpPdf"
    }

    fn content_type(&self) -> &str {
        "application/pdf"
    }

    fn extension(&self) -> &str {
        "pdf"
    }

    async fn render_to_file(&self, html: &str, file_stem: &str) -> Result<PathBuf, CoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(html.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(renderer = self.name(), %status, "PDF rendering rejected");
            return Err(CoreError::Render(format!(
                "renderer answered with HTTP {status}"
            )));
        }

        let pdf = response.bytes().await?;
        if pdf.is_empty() {
            return Err(CoreError::Render("renderer returned an empty document".into()));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{file_stem}.{}", self.extension()));
        tokio::fs::write(&path, &pdf).await?;
        debug!(path = %path.display(), bytes = pdf.len(), "Rendered report PDF");
        Ok(path)
    }
}
