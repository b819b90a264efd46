//! Processing animation: A fixed four-stage sequence paced by elapsed time.
//!
//! It has no data dependency. The prediction may finish long before or after
//! the animation; the controller joins the two.

use std::time::Duration;

/// One named stage and how long it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub label: &'static str,
    pub detail: &'static str,
    pub duration: Duration,
}

pub const STAGES: [Stage; 4] = [
    Stage {
        label: "Data Preparation",
        detail: "Normalizing and validating health metrics",
        duration: Duration::from_millis(1500),
    },
    Stage {
        label: "Feature Analysis",
        detail: "Evaluating clinical risk indicators",
        duration: Duration::from_millis(2000),
    },
    Stage {
        label: "Model Inference",
        detail: "Running the Random Forest classifier",
        duration: Duration::from_millis(2500),
    },
    Stage {
        label: "Result Compilation",
        detail: "Preparing your personalized report",
        duration: Duration::from_millis(1500),
    },
];

/// Pause after each stage.
pub const STAGE_PAUSE: Duration = Duration::from_millis(300);

/// Pause after the final stage before "done".
pub const TRAILING_PAUSE: Duration = Duration::from_millis(500);

/// Where the sequence stands at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Index of the running (or just finished) stage.
    pub stage: usize,
    /// Progress within that stage, in `[0, 1]`.
    pub stage_progress: f64,
    /// Number of completed stages.
    pub completed: usize,
    /// Overall progress, in `[0, 1]`.
    pub overall: f64,
}

/// Total time from start to the "done" signal.
#[must_use]
pub fn total_duration() -> Duration {
    STAGES
        .iter()
        .map(|s| s.duration + STAGE_PAUSE)
        .sum::<Duration>()
        + TRAILING_PAUSE
}

/// Frame at `elapsed` since start.
#[must_use]
pub fn frame_at(elapsed: Duration) -> Frame {
    let mut offset = Duration::ZERO;
    for (i, stage) in STAGES.iter().enumerate() {
        let stage_end = offset + stage.duration;
        if elapsed < stage_end {
            let into = elapsed.saturating_sub(offset).as_secs_f64();
            return Frame {
                stage: i,
                stage_progress: into / stage.duration.as_secs_f64(),
                completed: i,
                overall: overall(i, into / stage.duration.as_secs_f64()),
            };
        }
        offset = stage_end + STAGE_PAUSE;
        if elapsed < offset {
            return Frame {
                stage: i,
                stage_progress: 1.0,
                completed: i + 1,
                overall: overall(i, 1.0),
            };
        }
    }
    Frame {
        stage: STAGES.len() - 1,
        stage_progress: 1.0,
        completed: STAGES.len(),
        overall: 1.0,
    }
}

fn overall(stage: usize, progress: f64) -> f64 {
    ((stage as f64 + progress) / STAGES.len() as f64).clamp(0.0, 1.0)
}

/// Drives the sequence from wall-clock ticks and reports "done" once.
#[derive(Debug, Clone)]
pub struct ProcessingAnimation {
    elapsed: Duration,
    signalled: bool,
}

impl Default for ProcessingAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingAnimation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            signalled: false,
        }
    }

    /// Set the elapsed time. Returns `true` exactly once, on the first call
    /// at or past the total duration.
    pub fn advance_to(&mut self, elapsed: Duration) -> bool {
        self.elapsed = self.elapsed.max(elapsed);
        if self.signalled || self.elapsed < total_duration() {
            return false;
        }
        self.signalled = true;
        true
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        frame_at(self.elapsed)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.signalled
    }
}
