//! Walk predecessor links from the terminal state back to the origin.

use std::ops::Range;

use crate::align::observer::AlignObserver;
use crate::align::search::{StateGraph, StatePos, Transition};
use crate::error::AlignError;

/// One transition on the optimal path, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    /// State the transition leaves
    pub from: StatePos,
    pub transition: Transition,
    pub cost: f64,
}

/// ASR tokens grouped under one lyric token.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedGroup {
    pub asr: Range<usize>,
    pub lyric_index: usize,
    pub cost: f64,
}

impl MappedGroup {
    pub fn asr_indices(&self) -> Vec<usize> {
        self.asr.clone().collect()
    }
}

/// Reconstruct the path ending at arena id `terminal`.
///
/// Fails with [`AlignError::InconsistentBacktrace`] if the chain breaks before
/// reaching `(0, 0)` or loops.
pub fn backtrace(
    graph: &StateGraph,
    terminal: usize,
    observer: &mut dyn AlignObserver,
) -> Result<Vec<PathStep>, AlignError> {
    let Some(end) = graph.get(terminal) else {
        return Err(AlignError::broken_chain(StatePos::ORIGIN));
    };
    observer.backtrace_started(end.pos);

    let mut steps = Vec::new();
    let mut current = end;
    while current.pos != StatePos::ORIGIN {
        // A chain longer than the arena must contain a cycle
        if steps.len() >= graph.len() {
            return Err(AlignError::broken_chain(current.pos));
        }
        let link = current
            .link
            .ok_or_else(|| AlignError::broken_chain(current.pos))?;
        let prev = graph
            .get(link.prev)
            .ok_or_else(|| AlignError::broken_chain(current.pos))?;

        let (di, dj) = link.transition.step();
        if prev.pos.asr + di != current.pos.asr || prev.pos.lyric + dj != current.pos.lyric {
            return Err(AlignError::broken_chain(current.pos));
        }

        steps.push(PathStep {
            from: prev.pos,
            transition: link.transition,
            cost: link.cost,
        });
        current = prev;
    }

    steps.reverse();
    Ok(steps)
}

/// Keep only the many-to-one steps, as `(asr range → lyric index)` groups.
pub fn mapped_groups(steps: &[PathStep]) -> Vec<MappedGroup> {
    steps
        .iter()
        .filter_map(|step| match step.transition {
            Transition::Map { group } => Some(MappedGroup {
                asr: step.from.asr..step.from.asr + group,
                lyric_index: step.from.lyric,
                cost: step.cost,
            }),
            Transition::SkipAsr | Transition::SkipLyric => None,
        })
        .collect()
}
