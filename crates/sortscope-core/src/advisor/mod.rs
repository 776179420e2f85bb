//! Advisory text service: plain-language explanations and quizzes about the
//! selected algorithm. The playback engine never depends on it.

mod gemini;
pub mod retry;

pub use gemini::GeminiAdvisor;
pub use retry::RetryPolicy;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::producers::Algorithm;
use crate::{Error, Result};

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Text of the correct option
    pub answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.answer
    }

    /// Index of the correct option, if the answer is among the options
    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o == &self.answer)
    }
}

/// A quiz in progress. Each question can be answered once.
#[derive(Debug, Clone, Default)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<usize>>,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let answers = vec![None; questions.len()];
        Self { questions, answers }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Chosen option for question `question`, if answered
    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    /// Record an answer. Returns whether it was correct, or `None` when the
    /// question was already answered or the indices are out of range.
    pub fn choose(&mut self, question: usize, option: usize) -> Option<bool> {
        let q = self.questions.get(question)?;
        let text = q.options.get(option)?;
        let slot = self.answers.get_mut(question)?;
        if slot.is_some() {
            return None;
        }
        *slot = Some(option);
        Some(q.is_correct(text))
    }

    /// First question without an answer
    pub fn current(&self) -> Option<usize> {
        self.answers.iter().position(|a| a.is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.current().is_none()
    }

    /// (correct, answered)
    pub fn score(&self) -> (usize, usize) {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter_map(|(q, a)| a.map(|idx| q.is_correct(&q.options[idx])))
            .fold((0, 0), |(correct, answered), ok| (correct + ok as usize, answered + 1))
    }
}

/// Trait for advisory text providers
#[async_trait::async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Explain the algorithm for a beginner
    async fn explain(&self, algorithm_name: &str) -> Result<String>;

    /// Three multiple-choice questions about the algorithm
    async fn quiz(&self, algorithm_name: &str) -> Result<Vec<QuizQuestion>>;
}

/// Advisor that wraps the configured provider
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn AdvisoryProvider>,
}

impl Advisor {
    /// Create an advisor based on configuration
    pub fn new(config: &AiConfig) -> Result<Self> {
        if !config.enabled {
            return Err(Error::Config("AI features are disabled".to_string()));
        }
        let api_key = config
            .api_key()
            .ok_or_else(|| Error::Config("Gemini API key not configured".to_string()))?;

        let provider = GeminiAdvisor::new(&api_key, &config.gemini_model, config.request_timeout())?
            .with_policy(RetryPolicy::from_config(config));
        Ok(Self::with_provider(Arc::new(provider)))
    }

    pub fn with_provider(provider: Arc<dyn AdvisoryProvider>) -> Self {
        Self { provider }
    }

    pub async fn explain(&self, algorithm: Algorithm) -> Result<String> {
        self.provider.explain(algorithm.display_name()).await
    }

    pub async fn quiz(&self, algorithm: Algorithm) -> Result<Quiz> {
        let questions = self.provider.quiz(algorithm.display_name()).await?;
        Ok(Quiz::new(questions))
    }
}
