//! Animation producers: one pure function per algorithm, each mapping an
//! array snapshot to the step sequence that replays its sort.

mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use bubble::bubble;
pub use insertion::insertion;
pub use merge::merge;
pub use quick::quick;
pub use selection::selection;

use serde::{Deserialize, Serialize};

use crate::steps::Step;

/// The fixed set of algorithms the visualizer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
    ];

    /// Look up an algorithm by identifier.
    ///
    /// Accepts the short ids (`bubble`) and the long form (`bubbleSort`,
    /// `bubble-sort`), case-insensitively. Anything else is `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        let normalized: String = id
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let short = normalized.strip_suffix("sort").unwrap_or(&normalized);
        match short {
            "bubble" => Some(Algorithm::Bubble),
            "selection" => Some(Algorithm::Selection),
            "insertion" => Some(Algorithm::Insertion),
            "merge" => Some(Algorithm::Merge),
            "quick" => Some(Algorithm::Quick),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
        }
    }

    /// Human-readable name, also what the advisory service is asked about.
    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Merge => "Merge Sort",
            Algorithm::Quick => "Quick Sort",
        }
    }

    /// Next algorithm in `ALL`, wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|a| a == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous algorithm in `ALL`, wrapping around.
    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|a| a == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Produce the step sequence for `values` with this algorithm.
    pub fn produce(&self, values: &[i64]) -> Vec<Step> {
        match self {
            Algorithm::Bubble => bubble(values),
            Algorithm::Selection => selection(values),
            Algorithm::Insertion => insertion(values),
            Algorithm::Merge => merge(values),
            Algorithm::Quick => quick(values),
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Bubble
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::from_id(s).ok_or_else(|| crate::Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Produce steps for an algorithm given by identifier.
///
/// Unknown identifiers produce no sequence at all.
pub fn produce(id: &str, values: &[i64]) -> Option<Vec<Step>> {
    Algorithm::from_id(id).map(|algorithm| algorithm.produce(values))
}
