//! Export service: Report download and sharing.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::PRODUCT_NAME;
use crate::domain::PredictionResultData;
use crate::ports::{
    Clipboard, ExportError, ReportContext, ReportRenderer, ShareError, ShareOutcome, SharePayload,
    ShareTarget,
};
use crate::CardioError;

/// File name used when handing the report to a share target.
pub const SHARE_FILE_NAME: &str = "CardioAI-Report.pdf";

/// Result of a share request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareStatus {
    Shared { path: PathBuf },
    Copied,
    /// The user backed out; nothing to report.
    Cancelled,
}

/// Renders reports on demand and delivers them.
pub struct ExportService {
    renderer: Arc<dyn ReportRenderer>,
    share_target: Box<dyn ShareTarget>,
    clipboard: Box<dyn Clipboard>,
    report_dir: PathBuf,
    share_url: String,
}

impl ExportService {
    pub fn new(
        renderer: Arc<dyn ReportRenderer>,
        share_target: Box<dyn ShareTarget>,
        clipboard: Box<dyn Clipboard>,
        report_dir: PathBuf,
        share_url: String,
    ) -> Self {
        Self {
            renderer,
            share_target,
            clipboard,
            report_dir,
            share_url,
        }
    }

    /// `CardioAI-Full-Report-<YYYY-MM-DD>.pdf`
    #[must_use]
    pub fn download_file_name(context: &ReportContext) -> String {
        format!(
            "{PRODUCT_NAME}-Full-Report-{}.pdf",
            context.generated_on.format("%Y-%m-%d")
        )
    }

    /// Render the report and save it into the report directory.
    ///
    /// Downloading twice on the same day overwrites the file with identical bytes.
    ///
    /// # Errors
    /// Returns `ExportError` if rendering or writing fails.
    pub fn download(
        &self,
        data: &PredictionResultData,
        context: &ReportContext,
    ) -> Result<PathBuf, ExportError> {
        let document = self.renderer.render(data, context)?;
        fs::create_dir_all(&self.report_dir)?;
        let path = self.report_dir.join(Self::download_file_name(context));
        fs::write(&path, &document.bytes)?;
        tracing::info!("Report saved to {} ({} bytes)", path.display(), document.len());
        Ok(path)
    }

    /// Share the report natively, or copy a summary and link when no native
    /// target is available.
    ///
    /// # Errors
    /// Returns `CardioError::Export` if rendering fails and `CardioError::Share`
    /// if delivery fails. Cancellation is not an error.
    pub fn share(
        &self,
        data: &PredictionResultData,
        context: &ReportContext,
    ) -> Result<ShareStatus, CardioError> {
        if !self.share_target.is_available() {
            let text = format!(
                "{PRODUCT_NAME} Risk Score: {}% - {}",
                data.risk_score(),
                self.share_url
            );
            self.clipboard.copy(&text)?;
            tracing::info!("Native sharing unavailable, summary copied to clipboard");
            return Ok(ShareStatus::Copied);
        }

        let document = self.renderer.render(data, context)?;
        let payload = SharePayload {
            title: format!("My {PRODUCT_NAME} Risk Assessment"),
            text: format!(
                "I just received my cardiovascular risk assessment from {PRODUCT_NAME}. Risk Score: {}%",
                data.risk_score()
            ),
            url: self.share_url.clone(),
            file_name: SHARE_FILE_NAME.to_string(),
            document: Some(document),
        };

        match self.share_target.share(&payload) {
            Ok(ShareOutcome::Shared { path }) => Ok(ShareStatus::Shared { path }),
            Ok(ShareOutcome::Copied { .. }) => Ok(ShareStatus::Copied),
            Err(ShareError::Cancelled) => {
                tracing::debug!("Share cancelled by user");
                Ok(ShareStatus::Cancelled)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Insight, InsightKind};
    use crate::ports::ReportDocument;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct FakeRenderer;

    impl ReportRenderer for FakeRenderer {
        fn render(
            &self,
            data: &PredictionResultData,
            context: &ReportContext,
        ) -> Result<ReportDocument, ExportError> {
            Ok(ReportDocument::pdf(
                format!("%PDF {} {}", data.risk_score(), context.generated_on).into_bytes(),
            ))
        }
    }

    struct FailingRenderer;

    impl ReportRenderer for FailingRenderer {
        fn render(&self, _: &PredictionResultData, _: &ReportContext) -> Result<ReportDocument, ExportError> {
            Err(ExportError::Raster("no canvas".to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct FakeClipboard(Arc<Mutex<Vec<String>>>);

    impl Clipboard for FakeClipboard {
        fn copy(&self, text: &str) -> Result<(), ShareError> {
            self.0.lock().expect("lock").push(text.to_string());
            Ok(())
        }
    }

    struct FakeTarget {
        available: bool,
        response: fn() -> Result<ShareOutcome, ShareError>,
        payloads: Arc<Mutex<Vec<SharePayload>>>,
    }

    impl ShareTarget for FakeTarget {
        fn is_available(&self) -> bool {
            self.available
        }

        fn share(&self, payload: &SharePayload) -> Result<ShareOutcome, ShareError> {
            self.payloads.lock().expect("lock").push(payload.clone());
            (self.response)()
        }
    }

    fn context() -> ReportContext {
        ReportContext::new(NaiveDate::from_ymd_opt(2026, 10, 16).expect("date"))
    }

    fn data() -> PredictionResultData {
        PredictionResultData::new(
            41.0,
            90,
            Vec::new(),
            vec![Insight::new(InsightKind::Info, "note")],
        )
    }

    fn service(
        dir: PathBuf,
        target: FakeTarget,
        clipboard: FakeClipboard,
        renderer: Arc<dyn ReportRenderer>,
    ) -> ExportService {
        ExportService::new(
            renderer,
            Box::new(target),
            Box::new(clipboard),
            dir,
            "http://localhost:8080/".to_string(),
        )
    }

    fn target(available: bool, response: fn() -> Result<ShareOutcome, ShareError>) -> FakeTarget {
        FakeTarget {
            available,
            response,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(
            ExportService::download_file_name(&context()),
            "CardioAI-Full-Report-2026-10-16.pdf"
        );
    }

    #[test]
    fn test_download_twice_is_identical() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reports = dir.path().join("reports");
        let svc = service(
            reports.clone(),
            target(false, || Ok(ShareOutcome::Copied { text: String::new() })),
            FakeClipboard::default(),
            Arc::new(FakeRenderer),
        );

        let first = svc.download(&data(), &context()).expect("first");
        let first_bytes = fs::read(&first).expect("read");
        let second = svc.download(&data(), &context()).expect("second");
        assert_eq!(first, second);
        assert_eq!(first, reports.join("CardioAI-Full-Report-2026-10-16.pdf"));
        assert_eq!(first_bytes, fs::read(&second).expect("read"));
    }

    #[test]
    fn test_download_failure_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let svc = service(
            dir.path().to_path_buf(),
            target(false, || Ok(ShareOutcome::Copied { text: String::new() })),
            FakeClipboard::default(),
            Arc::new(FailingRenderer),
        );
        assert!(matches!(svc.download(&data(), &context()), Err(ExportError::Raster(_))));
        assert_eq!(fs::read_dir(dir.path()).expect("dir").count(), 0);
    }

    #[test]
    fn test_share_falls_back_to_clipboard() {
        let clipboard = FakeClipboard::default();
        let svc = service(
            PathBuf::from("."),
            target(false, || Err(ShareError::Failed("unreachable".to_string()))),
            clipboard.clone(),
            Arc::new(FailingRenderer),
        );
        assert_eq!(svc.share(&data(), &context()).expect("share"), ShareStatus::Copied);
        assert_eq!(
            clipboard.0.lock().expect("lock").as_slice(),
            ["CardioAI Risk Score: 41% - http://localhost:8080/".to_string()]
        );
    }

    #[test]
    fn test_native_share_payload() {
        let t = target(true, || {
            Ok(ShareOutcome::Shared {
                path: PathBuf::from("/share/CardioAI-Report.pdf"),
            })
        });
        let payloads = t.payloads.clone();
        let svc = service(PathBuf::from("."), t, FakeClipboard::default(), Arc::new(FakeRenderer));

        let status = svc.share(&data(), &context()).expect("share");
        assert_eq!(
            status,
            ShareStatus::Shared {
                path: PathBuf::from("/share/CardioAI-Report.pdf")
            }
        );

        let payloads = payloads.lock().expect("lock");
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].title, "My CardioAI Risk Assessment");
        assert!(payloads[0].text.ends_with("Risk Score: 41%"));
        assert_eq!(payloads[0].file_name, SHARE_FILE_NAME);
        assert!(payloads[0].document.is_some());
    }

    #[test]
    fn test_cancelled_share_is_benign() {
        let svc = service(
            PathBuf::from("."),
            target(true, || Err(ShareError::Cancelled)),
            FakeClipboard::default(),
            Arc::new(FakeRenderer),
        );
        assert_eq!(svc.share(&data(), &context()).expect("benign"), ShareStatus::Cancelled);
    }

    #[test]
    fn test_share_failure_is_reported() {
        let svc = service(
            PathBuf::from("."),
            target(true, || Err(ShareError::Failed("disk full".to_string()))),
            FakeClipboard::default(),
            Arc::new(FakeRenderer),
        );
        assert!(matches!(
            svc.share(&data(), &context()),
            Err(CardioError::Share(ShareError::Failed(_)))
        ));
    }
}
