use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use sortscope_core::advisor::{Advisor, Quiz};
use sortscope_core::playback::Advance;
use sortscope_core::session::{parse_custom_array, MAX_LEN, MIN_LEN};
use sortscope_core::{AppConfig, Algorithm, Session, Speed};
use tracing::{debug, warn};

use crate::event::AdvisoryResult;
use crate::theme::Theme;

/// Slider units moved per speed key press
pub const SPEED_STEP: u32 = 10;

/// Current input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing a comma-separated array
    CustomInput(String),
    Explanation,
    Quiz,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Progress of an advisory request for one algorithm
#[derive(Debug, Clone)]
pub enum Advisory<T> {
    Loading(Algorithm),
    Ready(Algorithm, T),
    Failed(Algorithm, String),
}

impl<T> Advisory<T> {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Advisory::Loading(a) | Advisory::Ready(a, _) | Advisory::Failed(a, _) => *a,
        }
    }
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub session: Session,
    pub theme: Theme,
    pub mode: Mode,
    /// Length used for the next generated array
    pub array_size: usize,
    pub status_message: Option<StatusMessage>,
    pub explanation: Option<Advisory<String>>,
    pub quiz: Option<Advisory<Quiz>>,
    pub should_quit: bool,
    advisor: Result<Advisor, String>,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Self {
        let advisor = Advisor::new(&config.ai).map_err(|e| e.to_string());
        if let Err(ref e) = advisor {
            debug!("Advisor unavailable: {}", e);
        }
        Self::with_advisor(config, theme, advisor)
    }

    /// Create an app with an explicit advisor (or the reason there is none)
    pub fn with_advisor(config: Arc<AppConfig>, theme: Theme, advisor: Result<Advisor, String>) -> Self {
        let mut app = Self {
            session: Session::new(&config.visualizer),
            array_size: config.visualizer.array_size(),
            config,
            theme,
            mode: Mode::Normal,
            status_message: None,
            explanation: None,
            quiz: None,
            should_quit: false,
            advisor,
        };
        app.generate_array(&mut rand::rng());
        app
    }

    pub fn algorithm(&self) -> Algorithm {
        self.session.algorithm()
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Advance the running sort. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        let was_sorting = self.session.is_sorting();
        if let (true, Some(Advance::Completed)) = (was_sorting, self.session.tick(now)) {
            let counters = self.session.counters();
            self.set_status(
                format!(
                    "{} finished: {} comparisons, {} swaps",
                    self.algorithm().display_name(),
                    counters.comparisons,
                    counters.swaps
                ),
                StatusKind::Success,
            );
        }
    }

    pub fn generate_array<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.session.controls().generate {
            self.set_status("Pause the sort before generating a new array", StatusKind::Info);
            return;
        }
        self.session.generate(self.array_size, rng);
        self.clear_status();
    }

    /// Grow or shrink the array. Changing the size regenerates it.
    pub fn resize_array<R: Rng + ?Sized>(&mut self, grow: bool, rng: &mut R) {
        if !self.session.controls().size {
            return;
        }
        let size = if grow {
            (self.array_size + 1).min(MAX_LEN)
        } else {
            self.array_size.saturating_sub(1).max(MIN_LEN)
        };
        if size != self.array_size {
            self.array_size = size;
            self.generate_array(rng);
        }
    }

    pub fn start_sort(&mut self) {
        if !self.session.controls().start {
            return;
        }
        self.clear_status();
        self.session.start();
    }

    pub fn toggle_pause(&mut self) {
        let controls = self.session.controls();
        if controls.pause_visible {
            self.session.pause();
        } else if controls.resume_visible {
            self.session.resume();
        }
    }

    pub fn cycle_algorithm(&mut self, forward: bool) {
        if !self.session.controls().algorithm {
            self.set_status("Algorithm can't change during a sort", StatusKind::Info);
            return;
        }
        let current = self.session.algorithm();
        let next = if forward { current.next() } else { current.prev() };
        self.session.set_algorithm(next);
    }

    pub fn change_speed(&mut self, faster: bool) {
        if !self.session.controls().speed {
            return;
        }
        let speed = self.session.speed();
        let speed = if faster {
            speed.faster(SPEED_STEP)
        } else {
            speed.slower(SPEED_STEP)
        };
        self.set_speed(speed);
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.session.set_speed(speed);
    }

    pub fn open_custom_input(&mut self) {
        if self.session.controls().custom_input {
            self.mode = Mode::CustomInput(String::new());
        }
    }

    /// Parse the typed array and load it into the session
    pub fn submit_custom_input(&mut self) {
        let Mode::CustomInput(input) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };
        match parse_custom_array(&input) {
            Ok(values) => {
                self.array_size = values.len();
                if self.session.load_custom(values) {
                    self.set_status("Custom array loaded successfully!", StatusKind::Success);
                }
            }
            Err(e) => self.set_status(e.to_string(), StatusKind::Error),
        }
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == Mode::Help {
            Mode::Normal
        } else {
            Mode::Help
        };
    }

    /// Open the explanation popup. Returns the advisor and algorithm to
    /// request when a fetch should be spawned.
    pub fn request_explanation(&mut self) -> Option<(Advisor, Algorithm)> {
        if !self.session.controls().explain {
            return None;
        }
        let algorithm = self.algorithm();
        self.mode = Mode::Explanation;
        let cached = matches!(
            &self.explanation,
            Some(Advisory::Ready(a, _)) | Some(Advisory::Loading(a)) if *a == algorithm
        );
        if cached {
            return None;
        }
        match &self.advisor {
            Ok(advisor) => {
                self.explanation = Some(Advisory::Loading(algorithm));
                Some((advisor.clone(), algorithm))
            }
            Err(e) => {
                self.explanation = Some(Advisory::Failed(algorithm, e.clone()));
                None
            }
        }
    }

    /// Open the quiz popup. A fresh quiz is requested every time.
    pub fn request_quiz(&mut self) -> Option<(Advisor, Algorithm)> {
        if !self.session.controls().quiz {
            return None;
        }
        let algorithm = self.algorithm();
        self.mode = Mode::Quiz;
        if matches!(&self.quiz, Some(Advisory::Loading(a)) if *a == algorithm) {
            return None;
        }
        match &self.advisor {
            Ok(advisor) => {
                self.quiz = Some(Advisory::Loading(algorithm));
                Some((advisor.clone(), algorithm))
            }
            Err(e) => {
                self.quiz = Some(Advisory::Failed(algorithm, e.clone()));
                None
            }
        }
    }

    /// Store a finished advisory request. Results for a request that is no
    /// longer pending are dropped.
    pub fn handle_advisory_result(&mut self, result: AdvisoryResult) {
        match result {
            AdvisoryResult::Explanation { algorithm, result } => {
                if !matches!(self.explanation, Some(Advisory::Loading(a)) if a == algorithm) {
                    debug!(algorithm = algorithm.id(), "dropping stale explanation");
                    return;
                }
                self.explanation = Some(match result {
                    Ok(text) => Advisory::Ready(algorithm, text),
                    Err(e) => {
                        warn!("Explanation failed: {}", e);
                        Advisory::Failed(algorithm, e)
                    }
                });
            }
            AdvisoryResult::Quiz { algorithm, result } => {
                if !matches!(self.quiz, Some(Advisory::Loading(a)) if a == algorithm) {
                    debug!(algorithm = algorithm.id(), "dropping stale quiz");
                    return;
                }
                self.quiz = Some(match result {
                    Ok(quiz) => Advisory::Ready(algorithm, quiz),
                    Err(e) => {
                        warn!("Quiz failed: {}", e);
                        Advisory::Failed(algorithm, e)
                    }
                });
            }
        }
    }

    /// Answer the current quiz question with option `option`
    pub fn answer_quiz(&mut self, option: usize) {
        let Some(Advisory::Ready(_, quiz)) = self.quiz.as_mut() else {
            return;
        };
        let Some(question) = quiz.current() else {
            return;
        };
        match quiz.choose(question, option) {
            Some(true) => self.set_status("Correct!", StatusKind::Success),
            Some(false) => {
                let answer = quiz.questions()[question].answer.clone();
                self.set_status(format!("Incorrect. The answer is: {}", answer), StatusKind::Error);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sortscope_core::advisor::{AdvisoryProvider, QuizQuestion};
    use sortscope_core::PlaybackState;
    use std::time::Duration;

    struct Canned;

    #[async_trait]
    impl AdvisoryProvider for Canned {
        async fn explain(&self, algorithm_name: &str) -> sortscope_core::Result<String> {
            Ok(format!("{} explained", algorithm_name))
        }

        async fn quiz(&self, _algorithm_name: &str) -> sortscope_core::Result<Vec<QuizQuestion>> {
            Ok(Vec::new())
        }
    }

    fn app() -> App {
        let advisor = Advisor::with_provider(Arc::new(Canned));
        App::with_advisor(Arc::new(AppConfig::default()), Theme::default(), Ok(advisor))
    }

    fn sample_quiz() -> Quiz {
        Quiz::new(vec![
            QuizQuestion {
                question: "Worst case?".to_string(),
                options: vec!["O(n)".to_string(), "O(n^2)".to_string()],
                answer: "O(n^2)".to_string(),
            },
            QuizQuestion {
                question: "Stable?".to_string(),
                options: vec!["Yes".to_string(), "No".to_string()],
                answer: "Yes".to_string(),
            },
        ])
    }

    #[test]
    fn test_new_generates_array() {
        let app = app();
        assert_eq!(app.session.values().len(), 15);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_resize_clamps_and_regenerates() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut app = app();
        app.resize_array(true, &mut rng);
        assert_eq!(app.array_size, MAX_LEN);

        for _ in 0..20 {
            app.resize_array(false, &mut rng);
        }
        assert_eq!(app.array_size, MIN_LEN);
        assert_eq!(app.session.values().len(), MIN_LEN);
    }

    #[test]
    fn test_custom_input_success_and_error() {
        let mut app = app();
        app.open_custom_input();
        app.mode = Mode::CustomInput("5,3,8,1,9,2".to_string());
        app.submit_custom_input();
        assert_eq!(app.session.values(), &[5, 3, 8, 1, 9, 2]);
        assert_eq!(app.array_size, 6);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(
            app.status_message.as_ref().map(|m| m.kind),
            Some(StatusKind::Success)
        );

        app.mode = Mode::CustomInput("1,2".to_string());
        app.submit_custom_input();
        assert_eq!(app.session.values(), &[5, 3, 8, 1, 9, 2]);
        let msg = app.status_message.clone().unwrap();
        assert_eq!(msg.kind, StatusKind::Error);
        assert_eq!(msg.text, "Array size must be between 5 and 15 numbers. You entered 2.");
    }

    #[test]
    fn test_controls_locked_while_sorting() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut app = app();
        let before = app.algorithm();
        app.start_sort();
        assert!(app.session.is_sorting());

        app.cycle_algorithm(true);
        assert_eq!(app.algorithm(), before);
        let values = app.session.values().to_vec();
        app.generate_array(&mut rng);
        assert_eq!(app.session.values(), &values[..]);
        assert!(app.request_explanation().is_none());
        assert_eq!(app.mode, Mode::Normal);

        app.toggle_pause();
        app.tick(Instant::now());
        assert_eq!(app.session.state(), PlaybackState::Paused);
        app.toggle_pause();
        assert_eq!(app.session.state(), PlaybackState::Running);
    }

    #[test]
    fn test_run_completion_sets_status() {
        let mut app = app();
        app.start_sort();
        let mut now = Instant::now();
        while app.session.is_sorting() {
            now += Duration::from_secs(1);
            app.tick(now);
        }
        let msg = app.status_message.clone().unwrap();
        assert_eq!(msg.kind, StatusKind::Success);
        assert!(msg.text.starts_with("Bubble Sort finished"));
    }

    #[test]
    fn test_explanation_flow() {
        let mut app = app();
        let (_, algorithm) = app.request_explanation().unwrap();
        assert_eq!(app.mode, Mode::Explanation);
        assert!(matches!(app.explanation, Some(Advisory::Loading(_))));
        // second request while loading does not spawn another fetch
        assert!(app.request_explanation().is_none());

        app.handle_advisory_result(AdvisoryResult::Explanation {
            algorithm,
            result: Ok("text".to_string()),
        });
        assert!(matches!(&app.explanation, Some(Advisory::Ready(_, t)) if t == "text"));
        assert!(app.request_explanation().is_none());

        // a stale result for another algorithm is ignored
        app.handle_advisory_result(AdvisoryResult::Explanation {
            algorithm: Algorithm::Quick,
            result: Ok("other".to_string()),
        });
        assert!(matches!(&app.explanation, Some(Advisory::Ready(_, t)) if t == "text"));
    }

    #[test]
    fn test_advisor_unavailable() {
        let mut app = App::with_advisor(
            Arc::new(AppConfig::default()),
            Theme::default(),
            Err("AI features are disabled".to_string()),
        );
        assert!(app.request_quiz().is_none());
        assert_eq!(app.mode, Mode::Quiz);
        assert!(matches!(&app.quiz, Some(Advisory::Failed(_, e)) if e.contains("disabled")));
    }

    #[test]
    fn test_answer_quiz() {
        let mut app = app();
        let (_, algorithm) = app.request_quiz().unwrap();
        app.handle_advisory_result(AdvisoryResult::Quiz {
            algorithm,
            result: Ok(sample_quiz()),
        });

        app.answer_quiz(1);
        assert_eq!(app.status_message.as_ref().unwrap().text, "Correct!");
        app.answer_quiz(1);
        assert_eq!(app.status_message.as_ref().unwrap().kind, StatusKind::Error);

        let Some(Advisory::Ready(_, quiz)) = &app.quiz else {
            panic!("quiz not ready");
        };
        assert!(quiz.is_complete());
        assert_eq!(quiz.score(), (1, 2));
    }
}
