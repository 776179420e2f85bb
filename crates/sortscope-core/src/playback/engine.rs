//! Playback engine: executes a step sequence in order against a
//! [`VisualElements`] set, keeping the cursor and counters for one run.
//!
//! Each step goes through two phases. [`Playback::apply_next`] performs the
//! step's mutation, adds its tags and bumps counters. [`Playback::settle`]
//! removes the transient tags and moves the cursor past it. The per-step
//! delay sits between the two. The pause flag is only consulted at the start
//! of `apply_next`, so a step is never left half-done.
//!
//! Two drivers sit on top of the primitive:
//! - [`Playback::run`] sleeps on the tokio timer between phases
//! - [`Playback::poll`] is called from a frame loop with the current instant

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::bars::{Tag, VisualElements};
use crate::steps::Step;

/// Running counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub comparisons: u64,
    pub swaps: u64,
}

/// Cooperative pause flag.
///
/// Cloning shares the flag, so a task that does not own the playback (a key
/// handler, a timer) can still request a pause.
#[derive(Debug, Clone, Default)]
pub struct PauseSignal(Arc<AtomicBool>);

impl PauseSignal {
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Result of one [`Playback::apply_next`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The step was applied and is held until `settle`.
    Applied(Step),
    /// The pause flag was raised; nothing was applied. Carries the cursor.
    Suspended(usize),
    Completed,
}

/// How a timed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Paused before executing the step at this index.
    Suspended(usize),
    Completed,
}

#[derive(Debug, Clone, Copy)]
struct HeldStep {
    step: Step,
    applied_at: Instant,
}

/// Run context for a single step sequence.
///
/// Cursor, counters and pause flag live and die with this value: a new run
/// means a new `Playback`.
#[derive(Debug)]
pub struct Playback {
    steps: Vec<Step>,
    cursor: usize,
    counters: Counters,
    delay: Duration,
    state: PlaybackState,
    pause: PauseSignal,
    held: Option<HeldStep>,
}

impl Playback {
    pub fn new(steps: Vec<Step>, delay: Duration) -> Self {
        Self {
            steps,
            cursor: 0,
            counters: Counters::default(),
            delay,
            state: PlaybackState::Idle,
            pause: PauseSignal::default(),
            held: None,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Index of the next step to execute.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the per-step delay. Takes effect from the next step.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Handle for raising the pause flag from elsewhere.
    pub fn pause_signal(&self) -> PauseSignal {
        self.pause.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Completed
    }

    /// Idle -> Running with a fresh cursor and zeroed counters.
    pub fn start(&mut self) {
        self.cursor = 0;
        self.counters = Counters::default();
        self.held = None;
        self.pause.clear();
        self.state = PlaybackState::Running;
        debug!(steps = self.steps.len(), "playback started");
    }

    /// Request a pause at the next step boundary.
    pub fn pause(&mut self) {
        if matches!(self.state, PlaybackState::Running | PlaybackState::Idle) {
            self.pause.raise();
        }
    }

    /// Paused -> Running. The saved cursor is re-checked first.
    pub fn resume(&mut self) {
        self.pause.clear();
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Running;
            debug!(cursor = self.cursor, "playback resumed");
        }
    }

    /// Execute the step under the cursor.
    ///
    /// A step still held from the previous call is settled first.
    pub fn apply_next<V: VisualElements + ?Sized>(&mut self, elements: &mut V) -> Advance {
        if self.held.is_some() {
            self.settle(elements);
        }

        match self.state {
            PlaybackState::Completed => return Advance::Completed,
            PlaybackState::Idle | PlaybackState::Paused => self.state = PlaybackState::Running,
            PlaybackState::Running => {}
        }

        if self.pause.is_raised() {
            self.state = PlaybackState::Paused;
            debug!(cursor = self.cursor, "playback suspended");
            return Advance::Suspended(self.cursor);
        }

        let Some(&step) = self.steps.get(self.cursor) else {
            self.complete();
            return Advance::Completed;
        };

        self.apply(step, elements);
        self.held = Some(HeldStep {
            step,
            applied_at: Instant::now(),
        });
        trace!(cursor = self.cursor, %step, "applied step");
        Advance::Applied(step)
    }

    /// Finish the held step: drop its transient tags and advance the cursor.
    pub fn settle<V: VisualElements + ?Sized>(&mut self, elements: &mut V) {
        let Some(held) = self.held.take() else {
            return;
        };

        match held.step {
            Step::Compare { i, j } => {
                elements.remove_tag(i, Tag::Comparing);
                elements.remove_tag(j, Tag::Comparing);
            }
            Step::Swap { i, j } => {
                elements.remove_tag(i, Tag::Swapping);
                elements.remove_tag(j, Tag::Swapping);
            }
            Step::Overwrite { index, .. } => elements.remove_tag(index, Tag::Swapping),
            // sorted and active tags outlive the step
            Step::MarkSorted { .. } | Step::HighlightActive { .. } | Step::ClearActiveHighlight { .. } => {}
        }

        self.cursor += 1;
        if self.cursor >= self.steps.len() {
            self.complete();
        }
    }

    /// Run until the sequence ends or the pause flag is seen, sleeping for
    /// the configured delay after every step.
    pub async fn run<V: VisualElements + ?Sized>(&mut self, elements: &mut V) -> RunOutcome {
        loop {
            match self.apply_next(elements) {
                Advance::Applied(_) => {
                    tokio::time::sleep(self.delay).await;
                    self.settle(elements);
                }
                Advance::Suspended(at) => return RunOutcome::Suspended(at),
                Advance::Completed => return RunOutcome::Completed,
            }
        }
    }

    /// Run starting at `start_index`, the entry point used when resuming a
    /// saved cursor.
    pub async fn run_from<V: VisualElements + ?Sized>(
        &mut self,
        elements: &mut V,
        start_index: usize,
    ) -> RunOutcome {
        if self.held.is_some() {
            self.settle(elements);
        }
        self.cursor = start_index.min(self.steps.len());
        self.pause.clear();
        self.state = PlaybackState::Running;
        self.run(elements).await
    }

    /// Drive playback from a frame loop.
    ///
    /// Each step is due `delay` after the previous one was scheduled, not
    /// after the frame that noticed it, so frames coarser than the delay
    /// apply several steps at once. The pause flag is checked before every
    /// step. Returns the last advance, or `None` when nothing was due.
    pub fn poll<V: VisualElements + ?Sized>(&mut self, elements: &mut V, now: Instant) -> Option<Advance> {
        let mut last = None;
        loop {
            let due = match self.held {
                Some(held) => {
                    let deadline = held.applied_at + self.delay;
                    if deadline > now {
                        return last;
                    }
                    self.settle(elements);
                    deadline
                }
                None => now,
            };

            match self.state {
                PlaybackState::Running => {}
                PlaybackState::Completed => return Some(Advance::Completed),
                PlaybackState::Idle | PlaybackState::Paused => return last,
            }

            let advance = self.apply_next(elements);
            match advance {
                Advance::Applied(_) => {
                    if let Some(held) = self.held.as_mut() {
                        held.applied_at = due;
                    }
                    last = Some(advance);
                }
                Advance::Suspended(_) | Advance::Completed => return Some(advance),
            }
        }
    }

    fn apply<V: VisualElements + ?Sized>(&mut self, step: Step, elements: &mut V) {
        match step {
            Step::Compare { i, j } => {
                elements.add_tag(i, Tag::Comparing);
                elements.add_tag(j, Tag::Comparing);
                self.counters.comparisons += 1;
            }
            Step::Swap { i, j } => {
                elements.add_tag(i, Tag::Swapping);
                elements.add_tag(j, Tag::Swapping);
                let a = elements.value(i);
                let b = elements.value(j);
                elements.set_value(i, b);
                elements.set_value(j, a);
                elements.remove_tag(i, Tag::Active);
                elements.remove_tag(j, Tag::Active);
                self.counters.swaps += 1;
            }
            Step::Overwrite { index, value } => {
                elements.set_value(index, value);
                elements.add_tag(index, Tag::Swapping);
                elements.remove_tag(index, Tag::Active);
            }
            Step::MarkSorted { index } => elements.add_tag(index, Tag::Sorted),
            Step::HighlightActive { index } => elements.add_tag(index, Tag::Active),
            Step::ClearActiveHighlight { index } => elements.remove_tag(index, Tag::Active),
        }
    }

    fn complete(&mut self) {
        if self.state != PlaybackState::Completed {
            self.state = PlaybackState::Completed;
            debug!(
                comparisons = self.counters.comparisons,
                swaps = self.counters.swaps,
                "playback completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::BarSet;
    use crate::producers::Algorithm;
    use crate::steps::StepSummary;

    fn playback_for(algorithm: Algorithm, values: &[i64]) -> (Playback, BarSet) {
        let steps = algorithm.produce(values);
        (Playback::new(steps, Duration::from_millis(100)), BarSet::from_values(values))
    }

    fn drain(playback: &mut Playback, bars: &mut BarSet) {
        while let Advance::Applied(_) = playback.apply_next(bars) {}
    }

    #[test]
    fn test_compare_tags_are_transient() {
        let mut bars = BarSet::from_values(&[2, 1]);
        let mut playback = Playback::new(vec![Step::compare(0, 1)], Duration::ZERO);
        playback.start();

        assert_eq!(playback.apply_next(&mut bars), Advance::Applied(Step::compare(0, 1)));
        assert!(bars.has_tag(0, Tag::Comparing));
        assert!(bars.has_tag(1, Tag::Comparing));
        assert_eq!(playback.cursor(), 0);

        playback.settle(&mut bars);
        assert!(bars.tags(0).is_empty());
        assert_eq!(playback.cursor(), 1);
        assert_eq!(playback.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_swap_exchanges_values_and_counts() {
        let mut bars = BarSet::from_values(&[5, 9]);
        let mut playback = Playback::new(vec![Step::swap(0, 1), Step::sorted(1)], Duration::ZERO);
        playback.start();
        drain(&mut playback, &mut bars);

        assert_eq!(bars.values(), vec![9, 5]);
        assert_eq!(playback.counters(), Counters { comparisons: 0, swaps: 1 });
        assert!(bars.has_tag(1, Tag::Sorted));
        assert!(!bars.has_tag(0, Tag::Swapping));
    }

    #[test]
    fn test_active_persists_until_cleared_or_overwritten() {
        let mut bars = BarSet::from_values(&[1, 2, 3]);
        let steps = vec![
            Step::highlight(2),
            Step::compare(0, 2),
            Step::highlight(0),
            Step::overwrite(0, 7),
            Step::clear_highlight(2),
        ];
        let mut playback = Playback::new(steps, Duration::ZERO);
        playback.start();

        playback.apply_next(&mut bars);
        playback.apply_next(&mut bars);
        playback.settle(&mut bars);
        assert!(bars.has_tag(2, Tag::Active));

        drain(&mut playback, &mut bars);
        assert!(bars.tagged(Tag::Active).is_empty());
        assert_eq!(bars.values(), vec![7, 2, 3]);
        // overwrite never counts
        assert_eq!(playback.counters().swaps, 0);
    }

    #[test]
    fn test_pause_has_no_side_effects() {
        let (mut playback, mut bars) = playback_for(Algorithm::Bubble, &[3, 1, 2]);
        playback.start();
        playback.apply_next(&mut bars);
        playback.pause();

        // held step still settles, then the flag is seen at the boundary
        let before_counters = playback.counters();
        assert_eq!(playback.apply_next(&mut bars), Advance::Suspended(1));
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.counters(), before_counters);
        assert!(bars.bars().iter().all(|b| !b.tags.contains(Tag::Comparing)));

        // repeated checks stay put
        playback.pause();
        assert_eq!(playback.apply_next(&mut bars), Advance::Suspended(1));

        playback.resume();
        assert_eq!(playback.state(), PlaybackState::Running);
        assert!(matches!(playback.apply_next(&mut bars), Advance::Applied(_)));
        assert_eq!(playback.cursor(), 1);
    }

    #[test]
    fn test_empty_sequence_completes() {
        let mut bars = BarSet::from_values(&[]);
        let mut playback = Playback::new(Vec::new(), Duration::ZERO);
        playback.start();
        assert_eq!(playback.apply_next(&mut bars), Advance::Completed);
        assert!(playback.is_finished());
    }

    #[test]
    fn test_counters_match_summary() {
        for algorithm in Algorithm::ALL {
            let values = [42, 7, 19, 7, 300, 12, 88, 1];
            let (mut playback, mut bars) = playback_for(algorithm, &values);
            playback.start();
            drain(&mut playback, &mut bars);

            let summary = StepSummary::of(playback.steps());
            assert_eq!(playback.counters().comparisons, summary.compares as u64, "{algorithm}");
            assert_eq!(playback.counters().swaps, summary.swaps as u64, "{algorithm}");
            assert_eq!(bars.values(), vec![1, 7, 7, 12, 19, 42, 88, 300], "{algorithm}");
        }
    }

    #[test]
    fn test_poll_respects_delay() {
        let (mut playback, mut bars) = playback_for(Algorithm::Selection, &[2, 1]);
        playback.start();
        let t0 = Instant::now();

        assert_eq!(playback.poll(&mut bars, t0), Some(Advance::Applied(Step::compare(0, 1))));
        assert_eq!(playback.poll(&mut bars, t0 + Duration::from_millis(50)), None);
        assert_eq!(playback.cursor(), 0);

        let t1 = t0 + Duration::from_millis(100);
        assert_eq!(playback.poll(&mut bars, t1), Some(Advance::Applied(Step::swap(0, 1))));
        assert_eq!(playback.cursor(), 1);
        assert_eq!(bars.values(), vec![1, 2]);
    }

    #[test]
    fn test_poll_keeps_schedule_across_coarse_frames() {
        let values: Vec<i64> = (0..10).rev().collect();
        let frame = Duration::from_millis(16);

        // cursor after 160ms of 16ms frames for a given step delay
        let cursor_after_frames = |delay_ms: u64| {
            let steps = Algorithm::Bubble.produce(&values);
            let mut bars = BarSet::from_values(&values);
            let mut playback = Playback::new(steps, Duration::from_millis(delay_ms));
            playback.start();
            let t0 = Instant::now();
            for k in 0..=10u32 {
                playback.poll(&mut bars, t0 + frame * k);
            }
            playback.cursor()
        };

        assert_eq!(cursor_after_frames(10), 16);
        assert_eq!(cursor_after_frames(16), 10);
        assert_eq!(cursor_after_frames(50), 3);
        assert_eq!(cursor_after_frames(100), 1);
    }

    #[test]
    fn test_poll_catch_up_stops_at_pause() {
        let (mut playback, mut bars) = playback_for(Algorithm::Bubble, &[4, 3, 2, 1]);
        playback.start();
        let t0 = Instant::now();
        playback.poll(&mut bars, t0);
        playback.pause();

        // several steps are overdue but none run past the flag
        assert_eq!(
            playback.poll(&mut bars, t0 + Duration::from_millis(500)),
            Some(Advance::Suspended(1))
        );
        assert_eq!(playback.cursor(), 1);
        assert_eq!(playback.counters(), Counters { comparisons: 1, swaps: 0 });
    }

    #[test]
    fn test_poll_pause_and_resume() {
        let (mut playback, mut bars) = playback_for(Algorithm::Selection, &[2, 1]);
        playback.start();
        let mut now = Instant::now();
        playback.poll(&mut bars, now);
        playback.pause();

        now += Duration::from_millis(100);
        assert_eq!(playback.poll(&mut bars, now), Some(Advance::Suspended(1)));
        now += Duration::from_millis(100);
        assert_eq!(playback.poll(&mut bars, now), None);

        playback.resume();
        let mut seen = Vec::new();
        loop {
            now += Duration::from_millis(100);
            match playback.poll(&mut bars, now) {
                Some(Advance::Applied(step)) => seen.push(step),
                Some(Advance::Completed) => break,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(seen, playback.steps()[1..].to_vec());
        assert_eq!(playback.counters(), Counters { comparisons: 1, swaps: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_run_pause_and_resume() {
        let values = [5, 3, 8, 1];
        let (mut playback, mut bars) = playback_for(Algorithm::Bubble, &values);
        playback.start();
        let signal = playback.pause_signal();

        // steps apply at t=0,100,200; the flag goes up mid-delay of step 2
        let (outcome, _) = tokio::join!(playback.run(&mut bars), async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            signal.raise();
        });
        assert_eq!(outcome, RunOutcome::Suspended(3));
        assert_eq!(playback.state(), PlaybackState::Paused);

        playback.resume();
        let outcome = playback.run(&mut bars).await;
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(bars.values(), vec![1, 3, 5, 8]);
        assert_eq!(playback.counters().comparisons, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_from_saved_index() {
        let values = [4, 2, 3, 1];
        let (mut full, mut full_bars) = playback_for(Algorithm::Insertion, &values);
        full.start();
        assert_eq!(full.run(&mut full_bars).await, RunOutcome::Completed);

        let (mut split, mut split_bars) = playback_for(Algorithm::Insertion, &values);
        split.start();
        for _ in 0..5 {
            split.apply_next(&mut split_bars);
        }
        split.pause();
        let saved = match split.apply_next(&mut split_bars) {
            Advance::Suspended(at) => at,
            other => panic!("expected suspension, got {other:?}"),
        };
        assert_eq!(saved, 5);

        assert_eq!(split.run_from(&mut split_bars, saved).await, RunOutcome::Completed);
        assert_eq!(split_bars, full_bars);
        assert_eq!(split.counters(), full.counters());
    }
}
