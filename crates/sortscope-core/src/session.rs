//! Session controller: owns the array, the selected algorithm and the
//! current run, and decides which controls are available.

use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::bars::BarSet;
use crate::config::VisualizerConfig;
use crate::playback::{Advance, Counters, Playback, PlaybackState, Speed};
use crate::producers::Algorithm;
use crate::{Error, Result};

/// Smallest array the visualizer accepts.
pub const MIN_LEN: usize = 5;
/// Largest array the visualizer accepts.
pub const MAX_LEN: usize = 15;

/// Parse a comma-separated list of integers typed by the user.
pub fn parse_custom_array(input: &str) -> Result<Vec<i64>> {
    let parsed: std::result::Result<Vec<i64>, _> =
        input.split(',').map(|token| token.trim().parse::<i64>()).collect();

    let values = parsed.map_err(|_| {
        Error::InvalidInput("Invalid input. Please enter a comma-separated list of numbers.".to_string())
    })?;

    if !(MIN_LEN..=MAX_LEN).contains(&values.len()) {
        return Err(Error::InvalidInput(format!(
            "Array size must be between {} and {} numbers. You entered {}.",
            MIN_LEN,
            MAX_LEN,
            values.len()
        )));
    }

    Ok(values)
}

/// Which controls the front end should offer right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub generate: bool,
    pub custom_input: bool,
    pub size: bool,
    pub speed: bool,
    pub algorithm: bool,
    pub explain: bool,
    pub quiz: bool,
    pub pause_visible: bool,
    pub resume_visible: bool,
}

pub struct Session {
    values: Vec<i64>,
    bars: BarSet,
    algorithm: Algorithm,
    speed: Speed,
    min_value: i64,
    max_value: i64,
    playback: Option<Playback>,
}

impl Session {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            values: Vec::new(),
            bars: BarSet::default(),
            algorithm: config.default_algorithm,
            speed: Speed::from_slider(config.speed),
            min_value: config.min_value,
            max_value: config.max_value.max(config.min_value.saturating_add(1)),
            playback: None,
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn bars(&self) -> &BarSet {
        &self.bars
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.playback
            .as_ref()
            .map(|p| p.state())
            .unwrap_or(PlaybackState::Idle)
    }

    /// True while a run is actively stepping.
    pub fn is_sorting(&self) -> bool {
        self.state() == PlaybackState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == PlaybackState::Paused
    }

    pub fn counters(&self) -> Counters {
        self.playback.as_ref().map(|p| p.counters()).unwrap_or_default()
    }

    /// Fill the array with `len` random values. Abandons a paused run.
    pub fn generate<R: Rng + ?Sized>(&mut self, len: usize, rng: &mut R) -> bool {
        if self.is_sorting() {
            return false;
        }
        // inclusive so a range pinned at i64::MAX is never empty
        let high = self.max_value.saturating_sub(1).max(self.min_value);
        let values: Vec<i64> = (0..len)
            .map(|_| rng.random_range(self.min_value..=high))
            .collect();
        info!(len, "generated array");
        self.replace_values(values);
        true
    }

    /// Use a validated array supplied by the user. Abandons a paused run.
    pub fn load_custom(&mut self, values: Vec<i64>) -> bool {
        if self.is_sorting() {
            return false;
        }
        info!(len = values.len(), "loaded custom array");
        self.replace_values(values);
        true
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> bool {
        if self.is_sorting() {
            return false;
        }
        self.algorithm = algorithm;
        true
    }

    /// Select by identifier. Unknown identifiers leave the selection alone.
    pub fn set_algorithm_id(&mut self, id: &str) -> bool {
        match Algorithm::from_id(id) {
            Some(algorithm) => self.set_algorithm(algorithm),
            None => false,
        }
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        if let Some(playback) = self.playback.as_mut() {
            playback.set_delay(speed.delay());
        }
    }

    /// Start a new run of the selected algorithm over the current array.
    pub fn start(&mut self) -> bool {
        if self.is_sorting() {
            return false;
        }
        let steps = self.algorithm.produce(&self.values);
        info!(
            algorithm = self.algorithm.id(),
            len = self.values.len(),
            steps = steps.len(),
            "starting sort"
        );

        self.bars = BarSet::from_values(&self.values);
        let mut playback = Playback::new(steps, self.speed.delay());
        playback.start();
        self.playback = Some(playback);
        true
    }

    /// Start a run for an algorithm given by identifier.
    ///
    /// An unknown identifier produces no sequence and changes nothing.
    pub fn start_with_id(&mut self, id: &str) -> bool {
        if self.is_sorting() {
            return false;
        }
        match Algorithm::from_id(id) {
            Some(algorithm) => {
                self.algorithm = algorithm;
                self.start()
            }
            None => {
                debug!(id, "unknown algorithm id, nothing to animate");
                false
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.pause();
        }
    }

    pub fn resume(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.resume();
        }
    }

    /// Advance the current run from a frame loop.
    pub fn tick(&mut self, now: Instant) -> Option<Advance> {
        let playback = self.playback.as_mut()?;
        playback.poll(&mut self.bars, now)
    }

    pub fn controls(&self) -> Controls {
        let state = self.state();
        let running = state == PlaybackState::Running;
        let paused = state == PlaybackState::Paused;
        let idle = !running && !paused;
        Controls {
            start: idle && !self.values.is_empty(),
            generate: !running,
            custom_input: !running,
            size: !running,
            speed: !running,
            algorithm: idle,
            explain: !running,
            quiz: !running,
            pause_visible: running,
            resume_visible: paused,
        }
    }

    fn replace_values(&mut self, values: Vec<i64>) {
        self.bars = BarSet::from_values(&values);
        self.values = values;
        // counters, cursor and steps go with the old run
        self.playback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn session() -> Session {
        Session::new(&VisualizerConfig::default())
    }

    fn run_to_end(session: &mut Session) {
        let mut now = Instant::now();
        loop {
            now += Duration::from_secs(1);
            if let Some(Advance::Completed) = session.tick(now) {
                break;
            }
        }
    }

    #[test]
    fn test_parse_custom_array() {
        assert_eq!(parse_custom_array("5, 3,8 ,1,9").unwrap(), vec![5, 3, 8, 1, 9]);
        assert_eq!(parse_custom_array("-1,0,1,2,3").unwrap(), vec![-1, 0, 1, 2, 3]);

        let err = parse_custom_array("1,2,x,4,5").unwrap_err();
        assert!(err.to_string().starts_with("Invalid input"));

        let err = parse_custom_array("1,2,3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Array size must be between 5 and 15 numbers. You entered 3."
        );
        assert!(parse_custom_array("").is_err());
        assert!(parse_custom_array(&vec!["1"; 16].join(",")).is_err());
    }

    #[test]
    fn test_generate_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = session();
        assert!(session.generate(12, &mut rng));
        assert_eq!(session.values().len(), 12);
        assert!(session.values().iter().all(|v| (10..380).contains(v)));
        assert_eq!(session.bars().values(), session.values());
    }

    #[test]
    fn test_generate_with_extreme_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = VisualizerConfig {
            min_value: i64::MAX,
            max_value: 0,
            ..VisualizerConfig::default()
        };
        let mut session = Session::new(&config);
        assert!(session.generate(5, &mut rng));
        assert!(session.values().iter().all(|v| *v == i64::MAX));
    }

    #[test]
    fn test_full_run_and_controls() {
        let mut session = session();
        session.load_custom(vec![5, 3, 8, 1, 4]);
        assert!(session.controls().start);
        assert!(session.start());
        assert!(session.is_sorting());

        let controls = session.controls();
        assert!(!controls.start && !controls.generate && !controls.algorithm);
        assert!(controls.pause_visible && !controls.resume_visible);
        assert!(!session.start());
        assert!(!session.set_algorithm(Algorithm::Quick));

        run_to_end(&mut session);
        assert!(!session.is_sorting());
        assert_eq!(session.bars().values(), vec![1, 3, 4, 5, 8]);
        assert!(session.controls().start);
    }

    #[test]
    fn test_regenerate_after_pause_resets() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = session();
        session.load_custom(vec![9, 8, 7, 6, 5]);
        session.start();
        let now = Instant::now();
        session.tick(now);
        session.pause();
        session.tick(now + Duration::from_secs(1));
        assert!(session.is_paused());
        assert!(session.counters().comparisons > 0);

        let controls = session.controls();
        assert!(controls.resume_visible && controls.generate && !controls.start);

        assert!(session.generate(6, &mut rng));
        assert_eq!(session.counters(), Counters::default());
        assert!(session.playback().is_none());
        assert_eq!(session.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_regenerate_after_completion_resets() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = session();
        session.load_custom(vec![2, 1, 3, 5, 4]);
        session.start();
        run_to_end(&mut session);
        assert!(session.counters().comparisons > 0);

        session.generate(5, &mut rng);
        assert_eq!(session.counters(), Counters::default());
        assert!(session.bars().bars().iter().all(|b| b.tags.is_empty()));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut session = session();
        session.load_custom(vec![2, 1, 3, 5, 4]);
        assert!(!session.start_with_id("stooge"));
        assert!(session.playback().is_none());
        assert_eq!(session.algorithm(), Algorithm::Bubble);

        assert!(session.start_with_id("mergeSort"));
        assert_eq!(session.algorithm(), Algorithm::Merge);
    }

    #[test]
    fn test_select_by_id() {
        let mut session = session();
        assert!(session.set_algorithm_id("insertion"));
        assert_eq!(session.algorithm(), Algorithm::Insertion);
        assert!(!session.set_algorithm_id("bogo"));
        assert_eq!(session.algorithm(), Algorithm::Insertion);
    }

    #[test]
    fn test_restart_rebuilds_bars() {
        let mut session = session();
        session.load_custom(vec![3, 1, 2, 5, 4]);
        session.start();
        run_to_end(&mut session);
        let first = session.counters();

        session.start();
        assert_eq!(session.counters(), Counters::default());
        assert_eq!(session.bars().values(), vec![3, 1, 2, 5, 4]);
        run_to_end(&mut session);
        assert_eq!(session.counters(), first);
    }

    #[test]
    fn test_fast_speeds_stay_distinct_at_frame_rate() {
        // frames needed to finish a reversed ten-element bubble run
        let frames_to_finish = |slider: u32| {
            let mut session = session();
            session.set_speed(Speed::from_slider(slider));
            session.load_custom((0..10).rev().collect());
            session.start();
            let t0 = Instant::now();
            let mut frames = 0u32;
            while session.state() != PlaybackState::Completed {
                session.tick(t0 + Duration::from_millis(16) * frames);
                frames += 1;
            }
            frames
        };

        let at_16ms = frames_to_finish(494);
        let at_10ms = frames_to_finish(500);
        assert!(at_10ms < at_16ms, "{at_10ms} vs {at_16ms}");
        // 100 steps at 10ms take about a second of 16ms frames
        assert!(at_10ms <= 64, "{at_10ms}");
    }

    #[test]
    fn test_speed_reaches_running_playback() {
        let mut session = session();
        session.load_custom(vec![3, 1, 2, 5, 4]);
        session.start();
        session.set_speed(Speed::from_slider(500));
        assert_eq!(
            session.playback().map(|p| p.delay()),
            Some(Duration::from_millis(10))
        );
    }
}
