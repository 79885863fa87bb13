//! Progress hooks called by the engine at fixed points.
//!
//! Observers see the run but never change its result.

use crate::align::search::StatePos;
use crate::types::Diagnostic;

/// Receives engine progress events. Every hook defaults to a no-op.
pub trait AlignObserver {
    fn search_started(&mut self, _asr_len: usize, _lyric_len: usize) {}

    /// A state was popped from the frontier and its transitions relaxed.
    fn state_expanded(&mut self, _state: StatePos, _score: f64) {}

    /// `expanded` counts resolved states; `total_cost` is `None` when the
    /// terminal was never reached.
    fn search_finished(&mut self, _expanded: usize, _total_cost: Option<f64>) {}

    fn backtrace_started(&mut self, _terminal: StatePos) {}

    fn interpolation_started(&mut self, _unresolved: usize) {}

    fn diagnostic(&mut self, _diagnostic: Diagnostic) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl AlignObserver for NullObserver {}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl AlignObserver for LogObserver {
    fn search_started(&mut self, asr_len: usize, lyric_len: usize) {
        log::info!(
            "Aligning {} ASR tokens to {} lyric tokens",
            asr_len,
            lyric_len
        );
    }

    fn state_expanded(&mut self, state: StatePos, score: f64) {
        log::trace!("Expand ({}, {}) score={:.4}", state.asr, state.lyric, score);
    }

    fn search_finished(&mut self, expanded: usize, total_cost: Option<f64>) {
        match total_cost {
            Some(cost) => log::info!(
                "Search finished: {} states expanded, total cost {:.4}",
                expanded,
                cost
            ),
            None => log::info!("Search exhausted after {} states", expanded),
        }
    }

    fn backtrace_started(&mut self, terminal: StatePos) {
        log::debug!("Backtrace from ({}, {})", terminal.asr, terminal.lyric);
    }

    fn interpolation_started(&mut self, unresolved: usize) {
        log::debug!("Interpolating {} untimed lyric tokens", unresolved);
    }

    fn diagnostic(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// Records events in order. Used to inspect engine runs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingObserver {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SearchStarted { asr_len: usize, lyric_len: usize },
    StateExpanded { state: StatePos, score: f64 },
    SearchFinished { expanded: usize, total_cost: Option<f64> },
    BacktraceStarted { terminal: StatePos },
    InterpolationStarted { unresolved: usize },
    Diagnostic(Diagnostic),
}

impl RecordingObserver {
    pub fn expanded_states(&self) -> Vec<StatePos> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::StateExpanded { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }
}

impl AlignObserver for RecordingObserver {
    fn search_started(&mut self, asr_len: usize, lyric_len: usize) {
        self.events.push(Event::SearchStarted { asr_len, lyric_len });
    }

    fn state_expanded(&mut self, state: StatePos, score: f64) {
        self.events.push(Event::StateExpanded { state, score });
    }

    fn search_finished(&mut self, expanded: usize, total_cost: Option<f64>) {
        self.events.push(Event::SearchFinished { expanded, total_cost });
    }

    fn backtrace_started(&mut self, terminal: StatePos) {
        self.events.push(Event::BacktraceStarted { terminal });
    }

    fn interpolation_started(&mut self, unresolved: usize) {
        self.events.push(Event::InterpolationStarted { unresolved });
    }

    fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.events.push(Event::Diagnostic(diagnostic));
    }
}
