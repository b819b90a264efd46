//! Share adapters: a drop-directory share target and an OSC 52 clipboard.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use base64::Engine;

use crate::ports::{Clipboard, ShareError, ShareOutcome, SharePayload, ShareTarget};

/// Native share target backed by a directory watched by the desktop
/// (e.g. a synced folder or an outbox).
pub struct ShareDirectory {
    root: Option<PathBuf>,
}

impl ShareDirectory {
    #[must_use]
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn root(&self) -> Result<&Path, ShareError> {
        self.root
            .as_deref()
            .ok_or_else(|| ShareError::Unavailable("no share directory configured".to_string()))
    }
}

impl ShareTarget for ShareDirectory {
    fn is_available(&self) -> bool {
        self.root.as_deref().is_some_and(Path::is_dir)
    }

    fn share(&self, payload: &SharePayload) -> Result<ShareOutcome, ShareError> {
        let root = self.root()?;
        let document = payload
            .document
            .as_ref()
            .ok_or_else(|| ShareError::Failed("nothing to share".to_string()))?;

        let path = root.join(&payload.file_name);
        let note = root.join(format!("{}.txt", payload.file_name.trim_end_matches(".pdf")));

        // Write to a temporary name first so watchers never pick up a partial file.
        let partial = root.join(format!(".{}.partial", payload.file_name));
        fs::write(&partial, &document.bytes)?;
        fs::rename(&partial, &path)?;

        // The report is already delivered; a missing note is not a failed share.
        let note_text = format!("{}\n\n{}\n{}\n", payload.title, payload.text, payload.url);
        if let Err(err) = fs::write(&note, note_text) {
            tracing::warn!("Share note not written to {}: {}", note.display(), err);
        }

        tracing::info!("Report shared to {}", path.display());
        Ok(ShareOutcome::Shared { path })
    }
}

/// Clipboard that uses the OSC 52 terminal escape sequence.
///
/// Works over SSH and in most modern terminal emulators without a system
/// clipboard library.
pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl Osc52Clipboard<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// OSC 52 "set clipboard" sequence for `text`.
#[must_use]
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&self, text: &str) -> Result<(), ShareError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ShareError::Failed("clipboard writer poisoned".to_string()))?;
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ReportDocument;

    fn payload(document: Option<ReportDocument>) -> SharePayload {
        SharePayload {
            title: "My CardioAI Risk Assessment".to_string(),
            text: "Risk Score: 12%".to_string(),
            url: "http://localhost:8080/".to_string(),
            file_name: "CardioAI-Report.pdf".to_string(),
            document,
        }
    }

    #[test]
    fn test_directory_share_writes_document_and_note() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = ShareDirectory::new(Some(dir.path().to_path_buf()));
        assert!(target.is_available());

        let outcome = target
            .share(&payload(Some(ReportDocument::pdf(b"%PDF-1.4 test".to_vec()))))
            .expect("share");
        let expected = dir.path().join("CardioAI-Report.pdf");
        assert_eq!(outcome, ShareOutcome::Shared { path: expected.clone() });
        assert_eq!(fs::read(&expected).expect("pdf"), b"%PDF-1.4 test");

        let note = fs::read_to_string(dir.path().join("CardioAI-Report.txt")).expect("note");
        assert!(note.starts_with("My CardioAI Risk Assessment"));
        assert!(note.contains("Risk Score: 12%"));
        assert!(!dir.path().join(".CardioAI-Report.pdf.partial").exists());
    }

    #[test]
    fn test_note_failure_does_not_fail_share() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory in the note's place makes the note write fail.
        fs::create_dir(dir.path().join("CardioAI-Report.txt")).expect("blocker");
        let target = ShareDirectory::new(Some(dir.path().to_path_buf()));

        let outcome = target
            .share(&payload(Some(ReportDocument::pdf(b"%PDF-1.4 test".to_vec()))))
            .expect("share");
        let expected = dir.path().join("CardioAI-Report.pdf");
        assert_eq!(outcome, ShareOutcome::Shared { path: expected.clone() });
        assert_eq!(fs::read(&expected).expect("pdf"), b"%PDF-1.4 test");
    }

    #[test]
    fn test_unconfigured_directory_is_unavailable() {
        let target = ShareDirectory::new(None);
        assert!(!target.is_available());
        assert!(matches!(
            target.share(&payload(None)),
            Err(ShareError::Unavailable(_))
        ));
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = ShareDirectory::new(Some(dir.path().join("absent")));
        assert!(!target.is_available());
    }

    #[test]
    fn test_share_without_document_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = ShareDirectory::new(Some(dir.path().to_path_buf()));
        assert!(matches!(target.share(&payload(None)), Err(ShareError::Failed(_))));
    }

    #[test]
    fn test_osc52_clipboard() {
        let clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy("hi").expect("copy");
        let written = clipboard.into_inner();
        assert_eq!(written, b"\x1b]52;c;aGk=\x07");
    }
}
