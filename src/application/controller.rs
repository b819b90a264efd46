//! Application controller: The hero → input → processing → results cycle.
//!
//! Pure state machine. The TUI feeds it user actions and completion signals;
//! it never performs I/O itself.

use crate::domain::{FormStep, PredictionResultData};

/// Top-level application state. No other states exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppState {
    Hero,
    Input,
    Processing,
    Results,
}

/// Navigation signal that starts intake immediately on launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySignal {
    GetStarted,
}

impl EntrySignal {
    /// Look for `--get-started` (or `#get-started`) among command-line arguments.
    pub fn from_args<I, S>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        args.into_iter()
            .any(|a| matches!(a.as_ref(), "--get-started" | "#get-started"))
            .then_some(Self::GetStarted)
    }
}

/// Join of the two independent completions of a processing cycle.
///
/// Opens only once both a result and the animation's "done" signal are
/// present, in either order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleGate {
    result: Option<PredictionResultData>,
    animation_done: bool,
}

impl CycleGate {
    pub fn clear(&mut self) {
        self.result = None;
        self.animation_done = false;
    }

    pub fn resolve(&mut self, result: PredictionResultData) {
        self.result = Some(result);
    }

    pub fn finish_animation(&mut self) {
        self.animation_done = true;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.animation_done && self.result.is_some()
    }

    /// Take the result if and only if the gate is open.
    fn take(&mut self) -> Option<PredictionResultData> {
        if !self.is_open() {
            return None;
        }
        self.animation_done = false;
        self.result.take()
    }
}

/// Owns the application state and the current cycle's result.
#[derive(Debug)]
pub struct Controller {
    state: AppState,
    gate: CycleGate,
    result: Option<PredictionResultData>,
    cycle: u64,
    entry: Option<EntrySignal>,
}

impl Controller {
    #[must_use]
    pub fn new(entry: Option<EntrySignal>) -> Self {
        Self {
            state: AppState::Hero,
            gate: CycleGate::default(),
            result: None,
            cycle: 0,
            entry,
        }
    }

    /// Apply the entry signal, at most once over the controller's lifetime.
    pub fn mount(&mut self) {
        if let Some(EntrySignal::GetStarted) = self.entry.take() {
            tracing::debug!("Entry signal: starting intake");
            self.get_started();
        }
    }

    #[must_use]
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Result shown in the results state.
    #[must_use]
    pub fn result(&self) -> Option<&PredictionResultData> {
        self.result.as_ref()
    }

    /// Identifier of the most recent processing cycle.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Hero → Input.
    pub fn get_started(&mut self) -> bool {
        self.transition(AppState::Hero, AppState::Input)
    }

    /// Input → Hero, only from the first form step.
    pub fn back(&mut self, step: FormStep) -> bool {
        step.is_first() && self.transition(AppState::Input, AppState::Hero)
    }

    /// Input → Processing. Returns the new cycle id.
    pub fn submit(&mut self) -> Option<u64> {
        if self.state != AppState::Input {
            return None;
        }
        self.result = None;
        self.gate.clear();
        self.cycle += 1;
        self.transition(AppState::Input, AppState::Processing);
        Some(self.cycle)
    }

    /// The prediction (or its fallback) for `cycle` has resolved.
    pub fn prediction_resolved(&mut self, cycle: u64, result: PredictionResultData) {
        if !self.accepts(cycle) {
            return;
        }
        self.gate.resolve(result);
        self.try_finish();
    }

    /// The processing animation for `cycle` has finished.
    pub fn animation_finished(&mut self, cycle: u64) {
        if !self.accepts(cycle) {
            return;
        }
        self.gate.finish_animation();
        self.try_finish();
    }

    /// Results → Hero, discarding the result.
    pub fn new_analysis(&mut self) -> bool {
        if !self.transition(AppState::Results, AppState::Hero) {
            return false;
        }
        self.result = None;
        self.gate.clear();
        true
    }

    fn accepts(&self, cycle: u64) -> bool {
        if self.state != AppState::Processing || cycle != self.cycle {
            tracing::debug!("Ignoring completion for stale cycle {}", cycle);
            return false;
        }
        true
    }

    fn try_finish(&mut self) {
        if let Some(result) = self.gate.take() {
            self.result = Some(result);
            self.transition(AppState::Processing, AppState::Results);
        }
    }

    fn transition(&mut self, from: AppState, to: AppState) -> bool {
        if self.state != from {
            return false;
        }
        tracing::info!("State {:?} -> {:?}", from, to);
        self.state = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(score: f64) -> PredictionResultData {
        PredictionResultData::new(score, 90, Vec::new(), Vec::new())
    }

    fn processing() -> (Controller, u64) {
        let mut c = Controller::new(None);
        assert!(c.get_started());
        let cycle = c.submit().expect("submitted");
        assert_eq!(c.state(), AppState::Processing);
        (c, cycle)
    }

    #[test]
    fn test_result_then_animation() {
        let (mut c, cycle) = processing();
        c.prediction_resolved(cycle, data(40.0));
        assert_eq!(c.state(), AppState::Processing);
        assert!(c.result().is_none());

        c.animation_finished(cycle);
        assert_eq!(c.state(), AppState::Results);
        assert_eq!(c.result().map(PredictionResultData::risk_score), Some(40));
    }

    #[test]
    fn test_animation_then_result() {
        let (mut c, cycle) = processing();
        c.animation_finished(cycle);
        assert_eq!(c.state(), AppState::Processing);

        c.prediction_resolved(cycle, data(12.0));
        assert_eq!(c.state(), AppState::Results);
    }

    #[test]
    fn test_one_completion_is_never_enough() {
        let (mut c, cycle) = processing();
        c.animation_finished(cycle);
        c.animation_finished(cycle);
        assert_eq!(c.state(), AppState::Processing);

        let (mut c, cycle) = processing();
        c.prediction_resolved(cycle, data(1.0));
        c.prediction_resolved(cycle, data(2.0));
        assert_eq!(c.state(), AppState::Processing);
    }

    #[test]
    fn test_gate() {
        let mut gate = CycleGate::default();
        assert!(!gate.is_open());
        gate.finish_animation();
        assert!(!gate.is_open());
        gate.resolve(data(3.0));
        assert!(gate.is_open());
        assert!(gate.take().is_some());
        assert!(!gate.is_open());
    }

    #[test]
    fn test_new_analysis_resets() {
        let (mut c, cycle) = processing();
        c.prediction_resolved(cycle, data(50.0));
        c.animation_finished(cycle);
        assert!(c.new_analysis());
        assert_eq!(c.state(), AppState::Hero);
        assert!(c.result().is_none());
        assert!(!c.new_analysis());
    }

    #[test]
    fn test_stale_cycle_is_ignored() {
        let (mut c, first) = processing();
        c.prediction_resolved(first, data(50.0));
        c.animation_finished(first);
        c.new_analysis();
        c.get_started();
        let second = c.submit().expect("second cycle");
        assert_ne!(first, second);

        c.prediction_resolved(first, data(99.0));
        c.animation_finished(second);
        assert_eq!(c.state(), AppState::Processing);

        c.prediction_resolved(second, data(10.0));
        assert_eq!(c.result().map(PredictionResultData::risk_score), Some(10));
    }

    #[test]
    fn test_back_only_from_first_step() {
        let mut c = Controller::new(None);
        c.get_started();
        assert!(!c.back(FormStep::Vitals));
        assert_eq!(c.state(), AppState::Input);
        assert!(c.back(FormStep::BasicInfo));
        assert_eq!(c.state(), AppState::Hero);
    }

    #[test]
    fn test_invalid_actions_are_ignored() {
        let mut c = Controller::new(None);
        assert!(c.submit().is_none());
        assert!(!c.new_analysis());
        c.animation_finished(0);
        assert_eq!(c.state(), AppState::Hero);

        let (mut c, _) = processing();
        assert!(!c.get_started());
        assert!(c.submit().is_none());
        assert!(!c.back(FormStep::BasicInfo));
    }

    #[test]
    fn test_entry_signal_applies_once() {
        let mut c = Controller::new(EntrySignal::from_args(["cardioai", "--get-started"]));
        c.mount();
        assert_eq!(c.state(), AppState::Input);
        c.back(FormStep::BasicInfo);
        c.mount();
        assert_eq!(c.state(), AppState::Hero);
    }

    #[test]
    fn test_entry_signal_parsing() {
        assert_eq!(EntrySignal::from_args(["#get-started"]), Some(EntrySignal::GetStarted));
        assert_eq!(EntrySignal::from_args(["cardioai", "--verbose"]), None);
        assert_eq!(EntrySignal::from_args(Vec::<String>::new()), None);
    }
}
