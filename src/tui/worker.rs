//! Background workers for prediction and report export.
//!
//! The prediction call and report rasterization both block, so each runs on
//! its own thread and reports back over a channel polled by the UI loop.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::application::{AssessmentService, ExportService, ShareStatus};
use crate::domain::{HealthInput, PredictionResultData};
use crate::ports::ReportContext;

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// Request is on its way to the service
    Sending { cycle: u64 },
    /// Display model ready (possibly the degraded fallback)
    Complete {
        cycle: u64,
        result: PredictionResultData,
    },
}

/// Outcome of an export job, flattened to user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportProgress {
    Downloaded(Result<std::path::PathBuf, String>),
    Shared(Result<ShareStatus, String>),
}

/// The worker thread ended without delivering its final update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

/// Handle to a running worker.
pub struct WorkerHandle<T> {
    rx: Receiver<T>,
    _handle: JoinHandle<()>,
}

impl<T> WorkerHandle<T> {
    /// Try to receive the next update (non-blocking).
    ///
    /// # Errors
    /// Returns `Disconnected` once the worker is gone and nothing is queued.
    pub fn try_recv(&self) -> Result<Option<T>, Disconnected> {
        match self.rx.try_recv() {
            Ok(update) => Ok(Some(update)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Disconnected),
        }
    }
}

pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn one prediction cycle.
    ///
    /// `input` is moved into the worker and zeroized there once the request
    /// has been built.
    pub fn spawn(
        service: Arc<Mutex<AssessmentService>>,
        cycle: u64,
        input: HealthInput,
    ) -> WorkerHandle<PredictionProgress> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || Self::run(service, cycle, input, tx));
        WorkerHandle { rx, _handle: handle }
    }

    fn run(
        service: Arc<Mutex<AssessmentService>>,
        cycle: u64,
        mut input: HealthInput,
        tx: Sender<PredictionProgress>,
    ) {
        let _ = tx.send(PredictionProgress::Sending { cycle });

        let result = match service.lock() {
            Ok(mut svc) => svc.assess(&input),
            Err(_) => {
                tracing::error!("Assessment service lock poisoned");
                crate::application::ResultsComposer::degraded()
            }
        };
        zeroize::Zeroize::zeroize(&mut input);

        let _ = tx.send(PredictionProgress::Complete { cycle, result });
    }
}

pub struct ExportWorker;

impl ExportWorker {
    /// Render and save the report.
    pub fn download(
        service: Arc<ExportService>,
        data: PredictionResultData,
        context: ReportContext,
    ) -> WorkerHandle<ExportProgress> {
        Self::spawn(move || {
            let outcome = service.download(&data, &context).map_err(|e| {
                tracing::warn!("Report download failed: {}", e);
                e.to_string()
            });
            ExportProgress::Downloaded(outcome)
        })
    }

    /// Render and share the report, or copy a summary.
    pub fn share(
        service: Arc<ExportService>,
        data: PredictionResultData,
        context: ReportContext,
    ) -> WorkerHandle<ExportProgress> {
        Self::spawn(move || {
            let outcome = service.share(&data, &context).map_err(|e| {
                tracing::warn!("Report share failed: {}", e);
                e.to_string()
            });
            ExportProgress::Shared(outcome)
        })
    }

    fn spawn<F>(job: F) -> WorkerHandle<ExportProgress>
    where
        F: FnOnce() -> ExportProgress + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let _ = tx.send(job());
        });
        WorkerHandle { rx, _handle: handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ResultsComposer;
    use crate::domain::{HealthRequest, PredictionResult};
    use crate::ports::{PredictionError, Predictor};
    use std::time::Duration;

    struct FixedPredictor;

    impl Predictor for FixedPredictor {
        fn predict(&self, _: &HealthRequest) -> Result<PredictionResult, PredictionError> {
            Ok(PredictionResult {
                risk_score: 22.0,
                prediction: 0,
            })
        }
    }

    fn wait<T>(handle: &WorkerHandle<T>) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(msg) = handle.rx.recv_timeout(Duration::from_secs(5)) {
            out.push(msg);
        }
        out
    }

    #[test]
    fn test_prediction_worker_reports_cycle() {
        let service = Arc::new(Mutex::new(AssessmentService::new(
            Arc::new(FixedPredictor),
            ResultsComposer::seeded(5),
        )));
        let handle = PredictionWorker::spawn(service, 7, HealthInput::sample());
        let updates = wait(&handle);

        assert!(matches!(updates.first(), Some(PredictionProgress::Sending { cycle: 7 })));
        match updates.last() {
            Some(PredictionProgress::Complete { cycle, result }) => {
                assert_eq!(*cycle, 7);
                assert_eq!(result.risk_score(), 22);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_dead_worker_reports_disconnect() {
        let (tx, rx) = mpsc::channel::<u8>();
        let handle = WorkerHandle {
            rx,
            _handle: thread::spawn(move || {
                let _ = tx.send(1);
            }),
        };
        let mut seen = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            match handle.try_recv() {
                Ok(Some(v)) => seen.push(v),
                Ok(None) if std::time::Instant::now() < deadline => thread::yield_now(),
                Ok(None) => panic!("worker never finished"),
                Err(Disconnected) => break,
            }
        }
        assert_eq!(seen, vec![1]);
    }
}
