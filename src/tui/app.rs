//! Main TUI application loop.
//!
//! Handles:
//! - Rendering the screen for the controller's current state
//! - Input event handling
//! - Driving the processing animation from wall-clock ticks
//! - Prediction and export via background workers

use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{HttpPredictor, Osc52Clipboard, ShareDirectory, SvgPdfRenderer};
use crate::application::{
    AppState, AssessmentService, Controller, EntrySignal, ExportService, ResultsComposer,
    ShareStatus,
};
use crate::config::Settings;
use crate::ports::ReportContext;

use super::animation::ProcessingAnimation;
use super::ui::{
    hero::render_hero,
    intake::{render_intake, FormAction, IntakeFormState},
    processing::render_processing,
    render_disclaimer, render_notification,
    results::{render_results, ResultsTab},
    Notification, NotificationKind,
};
use super::worker::{
    Disconnected, ExportProgress, ExportWorker, PredictionProgress, PredictionWorker,
    WorkerHandle,
};

/// Which export a pending worker is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportJob {
    Download,
    Share,
}

/// Main application state
pub struct App {
    /// Owns the hero → input → processing → results cycle
    controller: Controller,

    /// Whether the app should quit
    should_quit: bool,

    /// Prediction pipeline (wrapped in Arc<Mutex> for the worker thread)
    assessment: Arc<Mutex<AssessmentService>>,

    /// Report download and sharing
    export: Arc<ExportService>,

    /// Intake form buffers
    form: IntakeFormState,

    /// Selected results tab
    tab: ResultsTab,

    /// Processing animation for the current cycle
    animation: ProcessingAnimation,

    /// When the current processing cycle started
    processing_started_at: Option<Instant>,

    /// Pending prediction worker (if running)
    prediction_worker: Option<WorkerHandle<PredictionProgress>>,

    /// Pending export worker (if running)
    export_worker: Option<(ExportJob, WorkerHandle<ExportProgress>)>,

    /// Toast in the corner of the screen
    notification: Option<Notification>,
}

impl App {
    /// Create a new application instance from settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(settings: Settings, entry: Option<EntrySignal>) -> Result<Self> {
        let predictor = HttpPredictor::new(settings.api_url.clone(), settings.api_timeout)?;
        let assessment = Arc::new(Mutex::new(AssessmentService::new(
            Arc::new(predictor),
            ResultsComposer::new(),
        )));

        let export = Arc::new(ExportService::new(
            Arc::new(SvgPdfRenderer::new()),
            Box::new(ShareDirectory::new(settings.share_dir.clone())),
            Box::new(Osc52Clipboard::stdout()),
            settings.report_dir.clone(),
            settings.share_url.clone(),
        ));

        Ok(Self::with_dependencies(Controller::new(entry), assessment, export))
    }

    /// Create application with injected services.
    pub fn with_dependencies(
        controller: Controller,
        assessment: Arc<Mutex<AssessmentService>>,
        export: Arc<ExportService>,
    ) -> Self {
        Self {
            controller,
            should_quit: false,
            assessment,
            export,
            form: IntakeFormState::default(),
            tab: ResultsTab::default(),
            animation: ProcessingAnimation::new(),
            processing_started_at: None,
            prediction_worker: None,
            export_worker: None,
            notification: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.controller.mount();

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.form.clear_sensitive();
        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_prediction();
            self.tick_animation(Instant::now());
            self.poll_export();

            if self
                .notification
                .as_ref()
                .is_some_and(|n| n.is_expired(Instant::now()))
            {
                self.notification = None;
            }

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.controller.state() {
                    AppState::Hero => render_hero(f, content_area),
                    AppState::Input => render_intake(f, content_area, &self.form),
                    AppState::Processing => {
                        render_processing(f, content_area, &self.animation.frame());
                    }
                    AppState::Results => {
                        if let Some(data) = self.controller.result() {
                            render_results(f, content_area, data, self.tab);
                        }
                    }
                }

                render_disclaimer(f, disclaimer_area);

                if let Some(notification) = &self.notification {
                    render_notification(f, f.area(), notification);
                }
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain the prediction worker and feed its result to the controller.
    ///
    /// A worker that dies without a result resolves the cycle with the
    /// degraded fallback, so processing always ends.
    fn poll_prediction(&mut self) {
        while let Some(worker) = &self.prediction_worker {
            match worker.try_recv() {
                Ok(None) => break,
                Ok(Some(PredictionProgress::Sending { cycle })) => {
                    tracing::debug!("Cycle {} request sent", cycle);
                }
                Ok(Some(PredictionProgress::Complete { cycle, result })) => {
                    self.prediction_worker = None;
                    self.controller.prediction_resolved(cycle, result);
                    self.on_state_changed();
                }
                Err(Disconnected) => {
                    tracing::error!("Prediction worker stopped without a result");
                    self.prediction_worker = None;
                    let cycle = self.controller.cycle();
                    self.controller
                        .prediction_resolved(cycle, ResultsComposer::degraded());
                    self.on_state_changed();
                }
            }
        }
    }

    fn tick_animation(&mut self, now: Instant) {
        if self.controller.state() != AppState::Processing || self.animation.is_done() {
            return;
        }
        let Some(started_at) = self.processing_started_at else {
            return;
        };

        if self
            .animation
            .advance_to(now.saturating_duration_since(started_at))
        {
            self.controller.animation_finished(self.controller.cycle());
            self.on_state_changed();
        }
    }

    fn poll_export(&mut self) {
        let Some((job, worker)) = &self.export_worker else {
            return;
        };
        let progress = match worker.try_recv() {
            Ok(None) => return,
            Ok(Some(progress)) => progress,
            Err(Disconnected) => {
                tracing::error!("Export worker stopped without a result");
                let failed = "export worker stopped".to_string();
                match job {
                    ExportJob::Download => ExportProgress::Downloaded(Err(failed)),
                    ExportJob::Share => ExportProgress::Shared(Err(failed)),
                }
            }
        };
        self.export_worker = None;

        self.notification = match progress {
            ExportProgress::Downloaded(Ok(path)) => {
                tracing::debug!("Report written to {}", path.display());
                Some(Notification::new(
                    NotificationKind::Success,
                    "Success",
                    "Full report downloaded successfully.",
                ))
            }
            ExportProgress::Downloaded(Err(_)) => Some(Notification::new(
                NotificationKind::Error,
                "Download Failed",
                "There was an error generating your report.",
            )),
            ExportProgress::Shared(Ok(ShareStatus::Shared { .. })) => Some(Notification::new(
                NotificationKind::Success,
                "Shared",
                "Report handed to the share target.",
            )),
            ExportProgress::Shared(Ok(ShareStatus::Copied)) => Some(Notification::new(
                NotificationKind::Success,
                "Copied to Clipboard",
                "Result summary and link copied to clipboard.",
            )),
            ExportProgress::Shared(Ok(ShareStatus::Cancelled)) => None,
            ExportProgress::Shared(Err(_)) => Some(Notification::new(
                NotificationKind::Error,
                "Share Failed",
                "Could not share the report.",
            )),
        };
    }

    /// Reset per-state UI when the controller lands somewhere new.
    fn on_state_changed(&mut self) {
        if self.controller.state() == AppState::Results {
            self.tab = ResultsTab::default();
            self.processing_started_at = None;
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.controller.state() {
            AppState::Hero => self.handle_hero_key(key),
            AppState::Input => self.handle_input_key(key),
            AppState::Processing => {}
            AppState::Results => self.handle_results_key(key),
        }
    }

    fn handle_hero_key(&mut self, key: KeyCode) {
        if key == KeyCode::Enter {
            self.controller.get_started();
        }
    }

    fn handle_input_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.retreat(),
            KeyCode::Up | KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Down | KeyCode::Tab => self.form.focus_next(),
            KeyCode::Left => self.form.cycle_choice(false),
            KeyCode::Right => self.form.cycle_choice(true),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form.load_sample(),
            KeyCode::Char(c) => self.form.input_char(c),
            KeyCode::Backspace => {
                if !self.form.delete_char() {
                    self.retreat();
                }
            }
            KeyCode::Delete => self.form.clear_field(),
            KeyCode::Enter => self.advance(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('d') | KeyCode::Char('D') => self.start_download(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.start_share(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                if self.controller.new_analysis() {
                    self.form = IntakeFormState::default();
                    self.tab = ResultsTab::default();
                }
            }
            _ => {}
        }
    }

    fn advance(&mut self) {
        match self.form.next() {
            FormAction::Submit(input) => {
                let Some(cycle) = self.controller.submit() else {
                    return;
                };
                // Clear plaintext buffers from the UI immediately.
                self.form.clear_sensitive();
                self.animation = ProcessingAnimation::new();
                self.processing_started_at = Some(Instant::now());
                self.prediction_worker =
                    Some(PredictionWorker::spawn(self.assessment.clone(), cycle, input));
            }
            FormAction::Advanced(step) => tracing::debug!("Intake step {}", step.title()),
            _ => {}
        }
    }

    fn retreat(&mut self) {
        let step = self.form.step();
        if self.form.prev() == FormAction::Back {
            self.controller.back(step);
        }
    }

    fn start_download(&mut self) {
        if self.export_worker.is_some() {
            return;
        }
        let Some(data) = self.controller.result().cloned() else {
            return;
        };
        self.notification = Some(Notification::new(
            NotificationKind::Info,
            "Generating Report",
            "Compiling your comprehensive health analysis...",
        ));
        self.export_worker = Some((
            ExportJob::Download,
            ExportWorker::download(self.export.clone(), data, ReportContext::today()),
        ));
    }

    fn start_share(&mut self) {
        if self.export_worker.is_some() {
            return;
        }
        let Some(data) = self.controller.result().cloned() else {
            return;
        };
        self.notification = Some(Notification::new(
            NotificationKind::Info,
            "Preparing Share",
            "Generating your report for sharing...",
        ));
        self.export_worker = Some((
            ExportJob::Share,
            ExportWorker::share(self.export.clone(), data, ReportContext::today()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HealthInput, HealthRequest, PredictionResult, PredictionResultData};
    use crate::ports::{
        Clipboard, ExportError, PredictionError, Predictor, ReportDocument, ReportRenderer,
        ShareError, ShareOutcome, SharePayload, ShareTarget,
    };
    use crate::tui::animation::total_duration;

    struct FixedPredictor;

    impl Predictor for FixedPredictor {
        fn predict(&self, _: &HealthRequest) -> Result<PredictionResult, PredictionError> {
            Ok(PredictionResult {
                risk_score: 68.0,
                prediction: 1,
            })
        }
    }

    struct NullRenderer;

    impl ReportRenderer for NullRenderer {
        fn render(
            &self,
            _: &PredictionResultData,
            _: &ReportContext,
        ) -> Result<ReportDocument, ExportError> {
            Ok(ReportDocument::pdf(b"%PDF-1.4".to_vec()))
        }
    }

    struct NoTarget;

    impl ShareTarget for NoTarget {
        fn is_available(&self) -> bool {
            false
        }

        fn share(&self, _: &SharePayload) -> Result<ShareOutcome, ShareError> {
            Err(ShareError::Unavailable("no target".to_string()))
        }
    }

    struct NullClipboard;

    impl Clipboard for NullClipboard {
        fn copy(&self, _: &str) -> Result<(), ShareError> {
            Ok(())
        }
    }

    struct CrashingPredictor;

    impl Predictor for CrashingPredictor {
        fn predict(&self, _: &HealthRequest) -> Result<PredictionResult, PredictionError> {
            panic!("predictor crashed")
        }
    }

    struct CrashingRenderer;

    impl ReportRenderer for CrashingRenderer {
        fn render(
            &self,
            _: &PredictionResultData,
            _: &ReportContext,
        ) -> Result<ReportDocument, ExportError> {
            panic!("renderer crashed")
        }
    }

    fn app(entry: Option<EntrySignal>) -> App {
        app_with(Arc::new(FixedPredictor), Arc::new(NullRenderer), entry)
    }

    fn app_with(
        predictor: Arc<dyn Predictor>,
        renderer: Arc<dyn ReportRenderer>,
        entry: Option<EntrySignal>,
    ) -> App {
        let assessment = Arc::new(Mutex::new(AssessmentService::new(
            predictor,
            ResultsComposer::seeded(1),
        )));
        let export = Arc::new(ExportService::new(
            renderer,
            Box::new(NoTarget),
            Box::new(NullClipboard),
            std::env::temp_dir(),
            "http://localhost/".to_string(),
        ));
        App::with_dependencies(Controller::new(entry), assessment, export)
    }

    fn fill_form(app: &mut App) {
        app.handle_key(KeyCode::Char('s'), KeyModifiers::NONE);
        for _ in 0..4 {
            app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        }
    }

    fn wait_for_prediction(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.prediction_worker.is_some() && Instant::now() < deadline {
            app.poll_prediction();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_full_cycle_waits_for_animation() {
        let mut app = app(None);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.controller.state(), AppState::Input);

        fill_form(&mut app);
        assert_eq!(app.controller.state(), AppState::Processing);
        assert_eq!(app.form.input(), &HealthInput::default());

        wait_for_prediction(&mut app);
        assert_eq!(app.controller.state(), AppState::Processing);

        let started = app.processing_started_at.expect("started");
        app.tick_animation(started + total_duration());
        assert_eq!(app.controller.state(), AppState::Results);
        assert_eq!(app.controller.result().map(|r| r.risk_score()), Some(68));
    }

    #[test]
    fn test_entry_signal_and_back_to_hero() {
        let mut app = app(Some(EntrySignal::GetStarted));
        app.controller.mount();
        assert_eq!(app.controller.state(), AppState::Input);

        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.controller.state(), AppState::Hero);
    }

    #[test]
    fn test_backspace_on_empty_field_goes_back() {
        let mut app = app(Some(EntrySignal::GetStarted));
        app.controller.mount();
        app.handle_key(KeyCode::Char('4'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.controller.state(), AppState::Input);
        app.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.controller.state(), AppState::Hero);
    }

    #[test]
    fn test_share_without_target_copies() {
        let mut app = app(Some(EntrySignal::GetStarted));
        app.controller.mount();
        fill_form(&mut app);
        wait_for_prediction(&mut app);
        let started = app.processing_started_at.expect("started");
        app.tick_animation(started + total_duration());

        app.handle_key(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(
            app.notification.as_ref().map(|n| n.title.as_str()),
            Some("Preparing Share")
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.export_worker.is_some() && Instant::now() < deadline {
            app.poll_export();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(
            app.notification.as_ref().map(|n| n.title.as_str()),
            Some("Copied to Clipboard")
        );

        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.controller.state(), AppState::Hero);
        assert!(app.controller.result().is_none());
    }

    #[test]
    fn test_crashed_prediction_worker_degrades() {
        let mut app = app_with(
            Arc::new(CrashingPredictor),
            Arc::new(NullRenderer),
            Some(EntrySignal::GetStarted),
        );
        app.controller.mount();
        fill_form(&mut app);
        wait_for_prediction(&mut app);
        assert!(app.prediction_worker.is_none());

        let started = app.processing_started_at.expect("started");
        app.tick_animation(started + total_duration() + Duration::from_secs(60));
        assert_eq!(app.controller.state(), AppState::Results);
        assert_eq!(app.controller.result(), Some(&ResultsComposer::degraded()));
    }

    #[test]
    fn test_crashed_export_worker_reports_failure() {
        let mut app = app_with(
            Arc::new(FixedPredictor),
            Arc::new(CrashingRenderer),
            Some(EntrySignal::GetStarted),
        );
        app.controller.mount();
        fill_form(&mut app);
        wait_for_prediction(&mut app);
        let started = app.processing_started_at.expect("started");
        app.tick_animation(started + total_duration());

        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.export_worker.is_some() && Instant::now() < deadline {
            app.poll_export();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(app.export_worker.is_none());
        assert_eq!(
            app.notification.as_ref().map(|n| n.title.as_str()),
            Some("Download Failed")
        );
    }
}
