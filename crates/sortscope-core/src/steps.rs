//! Animation step vocabulary shared by the producers and the playback engine.

use serde::{Deserialize, Serialize};

/// One discrete visual operation.
///
/// A step sequence is a plain `Vec<Step>`: its order is the only ordering
/// information, no step carries a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Two indices are being compared. No mutation.
    Compare { i: usize, j: usize },
    /// Exchange the values at `i` and `j`.
    Swap { i: usize, j: usize },
    /// Set the displayed value at `index` directly.
    Overwrite { index: usize, value: i64 },
    /// `index` is settled. The sorted tag is never removed within a run.
    MarkSorted { index: usize },
    /// Transient emphasis (insertion key, quicksort pivot).
    HighlightActive { index: usize },
    ClearActiveHighlight { index: usize },
}

impl Step {
    pub fn compare(i: usize, j: usize) -> Self {
        Step::Compare { i, j }
    }

    pub fn swap(i: usize, j: usize) -> Self {
        Step::Swap { i, j }
    }

    pub fn overwrite(index: usize, value: i64) -> Self {
        Step::Overwrite { index, value }
    }

    pub fn sorted(index: usize) -> Self {
        Step::MarkSorted { index }
    }

    pub fn highlight(index: usize) -> Self {
        Step::HighlightActive { index }
    }

    pub fn clear_highlight(index: usize) -> Self {
        Step::ClearActiveHighlight { index }
    }

    /// Indices this step targets, in payload order.
    pub fn indices(&self) -> Vec<usize> {
        match *self {
            Step::Compare { i, j } | Step::Swap { i, j } => vec![i, j],
            Step::Overwrite { index, .. }
            | Step::MarkSorted { index }
            | Step::HighlightActive { index }
            | Step::ClearActiveHighlight { index } => vec![index],
        }
    }

    /// Whether the step changes displayed values.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Step::Swap { .. } | Step::Overwrite { .. })
    }

    /// Short lowercase name, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Compare { .. } => "compare",
            Step::Swap { .. } => "swap",
            Step::Overwrite { .. } => "overwrite",
            Step::MarkSorted { .. } => "sorted",
            Step::HighlightActive { .. } => "highlight-active",
            Step::ClearActiveHighlight { .. } => "remove-highlight-active",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Step::Compare { i, j } | Step::Swap { i, j } => write!(f, "{} {} {}", self.kind(), i, j),
            Step::Overwrite { index, value } => write!(f, "{} {} {}", self.kind(), index, value),
            Step::MarkSorted { index }
            | Step::HighlightActive { index }
            | Step::ClearActiveHighlight { index } => write!(f, "{} {}", self.kind(), index),
        }
    }
}

/// Apply the value-changing steps of `steps` to a copy of `values`.
///
/// Compare, highlight and sorted steps are ignored.
pub fn replay(values: &[i64], steps: &[Step]) -> Vec<i64> {
    let mut out = values.to_vec();
    for step in steps {
        match *step {
            Step::Swap { i, j } => out.swap(i, j),
            Step::Overwrite { index, value } => out[index] = value,
            _ => {}
        }
    }
    out
}

/// Per-kind step counts of a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub total: usize,
    pub compares: usize,
    pub swaps: usize,
    pub overwrites: usize,
    pub sorted_marks: usize,
}

impl StepSummary {
    pub fn of(steps: &[Step]) -> Self {
        let mut summary = StepSummary {
            total: steps.len(),
            ..Default::default()
        };
        for step in steps {
            match step {
                Step::Compare { .. } => summary.compares += 1,
                Step::Swap { .. } => summary.swaps += 1,
                Step::Overwrite { .. } => summary.overwrites += 1,
                Step::MarkSorted { .. } => summary.sorted_marks += 1,
                _ => {}
            }
        }
        summary
    }
}
