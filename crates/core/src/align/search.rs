//! Minimum-cost monotonic alignment search.
//!
//! States are grid points `(i, j)`: `i` ASR tokens and `j` lyric tokens
//! consumed. From each state three kinds of transition are relaxed:
//!
//! - map `asr[i..i+c]` onto `lyric[j]` for `c` in `1..=k` → `(i+c, j+1)`
//! - skip one ASR token → `(i+1, j)`
//! - skip one lyric token → `(i, j+1)`
//!
//! All costs are non-negative, so uniform-cost search from `(0, 0)` resolves
//! the terminal `(|asr|, |lyrics|)` at its optimal score. Only states actually
//! reached are materialized.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::align::observer::AlignObserver;
use crate::config::AlignConfig;
use crate::text::group_cost;
use crate::types::{AsrToken, LyricToken};

/// A grid point: how many ASR and lyric tokens have been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatePos {
    pub asr: usize,
    pub lyric: usize,
}

impl StatePos {
    pub const ORIGIN: StatePos = StatePos { asr: 0, lyric: 0 };

    pub fn new(asr: usize, lyric: usize) -> Self {
        Self { asr, lyric }
    }
}

/// The action that leads into a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `group` consecutive ASR tokens mapped onto one lyric token.
    Map { group: usize },
    SkipAsr,
    SkipLyric,
}

impl Transition {
    /// Grid offset `(asr, lyric)` this transition advances by.
    pub fn step(self) -> (usize, usize) {
        match self {
            Transition::Map { group } => (group, 1),
            Transition::SkipAsr => (1, 0),
            Transition::SkipLyric => (0, 1),
        }
    }
}

/// Best-known way into a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Arena id of the predecessor state
    pub prev: usize,
    pub transition: Transition,
    /// Cost of this transition alone
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub pos: StatePos,
    pub score: f64,
    pub link: Option<Link>,
    pub(crate) resolved: bool,
}

/// Arena of reached states. Predecessors are arena ids, never references.
#[derive(Debug, Default, Clone)]
pub struct StateGraph {
    pub(crate) records: Vec<StateRecord>,
    pub(crate) index: HashMap<StatePos, usize>,
}

impl StateGraph {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&StateRecord> {
        self.records.get(id)
    }

    pub fn id_of(&self, pos: StatePos) -> Option<usize> {
        self.index.get(&pos).copied()
    }

    pub fn score_of(&self, pos: StatePos) -> Option<f64> {
        self.id_of(pos).map(|id| self.records[id].score)
    }

    fn insert_origin(&mut self) -> usize {
        self.records.push(StateRecord {
            pos: StatePos::ORIGIN,
            score: 0.0,
            link: None,
            resolved: false,
        });
        self.index.insert(StatePos::ORIGIN, 0);
        0
    }

    /// Offer a new score for `pos`. Accepted only on strict improvement, so
    /// the first predecessor found keeps ties. Returns the state id when the
    /// offer was accepted.
    fn relax(&mut self, pos: StatePos, score: f64, link: Link) -> Option<usize> {
        match self.index.get(&pos) {
            Some(&id) => {
                let rec = &mut self.records[id];
                if rec.resolved || score >= rec.score {
                    return None;
                }
                rec.score = score;
                rec.link = Some(link);
                Some(id)
            }
            None => {
                let id = self.records.len();
                self.records.push(StateRecord {
                    pos,
                    score,
                    link: Some(link),
                    resolved: false,
                });
                self.index.insert(pos, id);
                Some(id)
            }
        }
    }
}

/// Frontier entry. Ordered so `BinaryHeap` pops the lowest score first and,
/// among equal scores, the earliest pushed.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    score: f64,
    seq: u64,
    id: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Result of one search run. Owns the state graph for backtracing.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub graph: StateGraph,
    /// Arena id of the terminal state, if it was resolved
    pub terminal: Option<usize>,
    /// Number of states popped and resolved
    pub expanded: usize,
}

impl SearchOutcome {
    pub fn total_cost(&self) -> Option<f64> {
        self.terminal
            .and_then(|id| self.graph.get(id))
            .map(|rec| rec.score)
    }
}

/// Find the minimum-cost path from `(0, 0)` to `(|asr|, |lyrics|)`.
///
/// `config` is assumed valid (see [`AlignConfig::validate`]).
pub fn search(
    asr: &[AsrToken],
    lyrics: &[LyricToken],
    config: &AlignConfig,
    observer: &mut dyn AlignObserver,
) -> SearchOutcome {
    let n_asr = asr.len();
    let n_lyr = lyrics.len();
    let goal = StatePos::new(n_asr, n_lyr);
    observer.search_started(n_asr, n_lyr);

    let mut graph = StateGraph::default();
    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;

    let origin = graph.insert_origin();
    heap.push(Frontier { score: 0.0, seq, id: origin });

    let mut terminal = None;
    let mut expanded = 0usize;

    while let Some(Frontier { score, id, .. }) = heap.pop() {
        let rec = &mut graph.records[id];
        // Stale entry: a cheaper push for this state was already handled
        if rec.resolved || score > rec.score {
            continue;
        }
        rec.resolved = true;
        let pos = rec.pos;
        expanded += 1;
        observer.state_expanded(pos, score);

        if pos == goal {
            terminal = Some(id);
            break;
        }

        let StatePos { asr: i, lyric: j } = pos;
        let mut offer = |graph: &mut StateGraph, transition: Transition, cost: f64| {
            let (di, dj) = transition.step();
            let next = StatePos::new(i + di, j + dj);
            let link = Link { prev: id, transition, cost };
            if let Some(next_id) = graph.relax(next, score + cost, link) {
                seq += 1;
                heap.push(Frontier { score: score + cost, seq, id: next_id });
            }
        };

        if j < n_lyr {
            let max_c = config.max_group.min(n_asr - i);
            for c in 1..=max_c {
                let cost = group_cost(&asr[i..i + c], &lyrics[j]);
                offer(&mut graph, Transition::Map { group: c }, cost);
            }
        }
        if i < n_asr {
            offer(&mut graph, Transition::SkipAsr, config.skip_asr_penalty);
        }
        if j < n_lyr {
            offer(&mut graph, Transition::SkipLyric, config.skip_lyric_penalty);
        }
    }

    let outcome = SearchOutcome { graph, terminal, expanded };
    observer.search_finished(expanded, outcome.total_cost());
    outcome
}
