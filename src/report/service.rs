//! Report service coordinating staging, extraction, and summarization.

use crate::{
    config::get_config,
    extraction::{self, ExtractedText},
    metrics::{MetricsSnapshot, ReportMetrics},
    report::types::{ReportError, ReportOutcome, ReportSettings},
    summarization::{
        ChatCompletionClient, SummarizationClient, SummarizationClientError, SummarizationRequest,
    },
    upload::{StagedUpload, UploadStore, UploadedFile},
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Runs one uploaded report through staging, extraction, and summarization.
///
/// The service owns the summarization client, the upload store, and the metrics registry so
/// the HTTP surface and the CLI share the same components. Construct it once near process
/// start and share it through an `Arc`.
pub struct ReportService {
    client: Arc<dyn SummarizationClient>,
    store: UploadStore,
    settings: ReportSettings,
    metrics: Arc<ReportMetrics>,
}

/// Abstraction over the report pipeline used by external surfaces.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Stage, extract, and summarize a single uploaded report.
    async fn summarize_upload(&self, upload: UploadedFile) -> Result<ReportOutcome, ReportError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ReportService {
    /// Build the service from the global configuration.
    pub fn new() -> Result<Self, SummarizationClientError> {
        let config = get_config();
        tracing::info!(base_url = %config.llm_base_url, "Initializing summarization client");
        let client = ChatCompletionClient::from_config(config)?;
        Ok(Self::from_parts(
            Arc::new(client),
            UploadStore::new(config.upload_dir.clone()),
            ReportSettings {
                model: config.llm_model.clone(),
                temperature: config.llm_temperature,
            },
        ))
    }

    /// Assemble a service from explicit components.
    pub fn from_parts(
        client: Arc<dyn SummarizationClient>,
        store: UploadStore,
        settings: ReportSettings,
    ) -> Self {
        Self {
            client,
            store,
            settings,
            metrics: Arc::new(ReportMetrics::new()),
        }
    }

    /// Stage, extract, and summarize a single uploaded report.
    ///
    /// The staged copy is removed before this returns, whichever way the pipeline ends.
    pub async fn summarize_upload(
        &self,
        upload: UploadedFile,
    ) -> Result<ReportOutcome, ReportError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "report",
            %request_id,
            file_name = upload.file_name()
        );

        async move {
            tracing::info!(
                bytes = upload.data().len(),
                sha256 = %hex::encode(Sha256::digest(upload.data())),
                "Processing report"
            );

            match self.run_pipeline(upload).await {
                Ok(outcome) => {
                    self.metrics.record_success(outcome.page_count as u64);
                    tracing::info!(
                        pages = outcome.page_count,
                        text_chars = outcome.text_chars,
                        summary_chars = outcome.summary.len(),
                        "Report summarized"
                    );
                    Ok(outcome)
                }
                Err(error) => {
                    self.metrics.record_failure();
                    tracing::warn!(kind = error.kind(), error = %error, "Report failed");
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_pipeline(&self, upload: UploadedFile) -> Result<ReportOutcome, ReportError> {
        let (_staged, extracted) = self.stage_and_extract(upload).await?;

        if extracted.is_blank() {
            tracing::warn!(
                pages = extracted.page_count,
                "No text extracted; forwarding empty report"
            );
        }

        let request = SummarizationRequest::for_report(
            self.settings.model.clone(),
            self.settings.temperature,
            &extracted.text,
        );
        let summary = self.client.generate_summary(request).await?;

        Ok(ReportOutcome {
            summary,
            page_count: extracted.page_count,
            text_chars: extracted.text.chars().count(),
        })
    }

    async fn stage_and_extract(
        &self,
        upload: UploadedFile,
    ) -> Result<(StagedUpload, ExtractedText), ReportError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || -> Result<_, ReportError> {
            let staged = store
                .stage(upload.file_name(), upload.data())
                .map_err(ReportError::Storage)?;
            let extracted = extraction::extract_text(staged.path())?;
            tracing::debug!(pages = extracted.page_count, "Extracted report text");
            Ok((staged, extracted))
        })
        .await?
    }

    /// Return the current processing metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl ReportApi for ReportService {
    async fn summarize_upload(&self, upload: UploadedFile) -> Result<ReportOutcome, ReportError> {
        ReportService::summarize_upload(self, upload).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ReportService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::build_pdf;
    use tokio::sync::Mutex;

    enum Reply {
        Summary(&'static str),
        Unavailable,
    }

    struct StubClient {
        reply: Reply,
        requests: Mutex<Vec<SummarizationRequest>>,
    }

    impl StubClient {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SummarizationClient for StubClient {
        async fn generate_summary(
            &self,
            request: SummarizationRequest,
        ) -> Result<String, SummarizationClientError> {
            self.requests.lock().await.push(request);
            match self.reply {
                Reply::Summary(text) => Ok(text.to_string()),
                Reply::Unavailable => Err(SummarizationClientError::ProviderUnavailable(
                    "connection refused".into(),
                )),
            }
        }
    }

    fn service(client: Arc<StubClient>, store: UploadStore) -> ReportService {
        ReportService::from_parts(
            client,
            store,
            ReportSettings {
                model: "stub-model".into(),
                temperature: 0.3,
            },
        )
    }

    fn staged_entries(store: &UploadStore) -> usize {
        std::fs::read_dir(store.dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn summarizes_extracted_text_and_cleans_up() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::new(root.path().join("uploads"));
        let client = StubClient::new(Reply::Summary("Patient Overview: John Doe"));
        let service = service(client.clone(), store.clone());

        let upload = UploadedFile::new(
            "report.pdf",
            build_pdf(&["Patient John Doe, diagnosis: flu."]).expect("pdf"),
        )
        .expect("upload");
        let outcome = service.summarize_upload(upload).await.expect("outcome");

        assert_eq!(outcome.summary, "Patient Overview: John Doe");
        assert_eq!(outcome.page_count, 1);

        let requests = client.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "stub-model");
        assert!(requests[0].prompt.contains("Patient John Doe, diagnosis: flu."));

        assert_eq!(staged_entries(&store), 0);
        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.reports_summarized, 1);
        assert_eq!(snapshot.pages_extracted, 1);
    }

    #[tokio::test]
    async fn malformed_pdf_fails_without_calling_model() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::new(root.path());
        let client = StubClient::new(Reply::Summary("unused"));
        let service = service(client.clone(), store.clone());

        let upload = UploadedFile::new("notes.pdf", b"plain text, not a pdf".to_vec())
            .expect("upload");
        let error = service.summarize_upload(upload).await.expect_err("parse failure");

        assert_eq!(error.kind(), "extraction");
        assert!(client.requests.lock().await.is_empty());
        assert_eq!(staged_entries(&store), 0);
        assert_eq!(service.metrics_snapshot().reports_failed, 1);
    }

    #[tokio::test]
    async fn provider_failure_is_typed_and_cleans_up() {
        let root = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::new(root.path());
        let service = service(StubClient::new(Reply::Unavailable), store.clone());

        let pdf = build_pdf(&["Stable vitals"]).expect("pdf");
        let upload = UploadedFile::new("report.pdf", pdf).expect("upload");
        let error = service.summarize_upload(upload).await.expect_err("provider down");

        assert!(matches!(
            error,
            ReportError::Summarization(SummarizationClientError::ProviderUnavailable(_))
        ));
        assert_eq!(staged_entries(&store), 0);
    }
}
