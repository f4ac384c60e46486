//! Quiz session state machine
//!
//! `Answering(i) --submit--> Answering(i + 1) | Complete`, with `reset`
//! returning a completed (or abandoned) session to `Answering(0)`.

use crate::error::{Error, Result};
use crate::generation::QuizQuestion;
use serde::Serialize;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QuizPhase {
    /// Waiting for an answer to question `index`
    Answering { index: usize },
    /// All questions answered
    Complete { score: usize, total: usize },
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was selected; state unchanged
    SelectionRequired,
    /// The session is already complete; state unchanged
    AlreadyComplete,
    /// The answer was scored and the session advanced
    Answered(AnswerFeedback),
}

/// Feedback for one scored answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub next: QuizPhase,
}

/// Performance band shown at the end of a quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizGrade {
    /// At least 70% correct
    Excellent,
    /// At least 50% correct
    Good,
    /// Below 50%
    KeepStudying,
}

/// A scored pass over a fixed list of questions
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: usize,
    selected_answer: Option<String>,
    complete: bool,
}

impl QuizSession {
    /// Start a session; fails with [`Error::NoQuestionsFound`] when empty
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::NoQuestionsFound);
        }
        Ok(Self {
            questions,
            current_index: 0,
            score: 0,
            selected_answer: None,
            complete: false,
        })
    }

    /// Current phase
    pub fn phase(&self) -> QuizPhase {
        if self.complete {
            QuizPhase::Complete {
                score: self.score,
                total: self.questions.len(),
            }
        } else {
            QuizPhase::Answering {
                index: self.current_index,
            }
        }
    }

    /// Question being answered, if not complete
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.complete {
            None
        } else {
            self.questions.get(self.current_index)
        }
    }

    /// Number of questions
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Correct answers so far
    pub fn score(&self) -> usize {
        self.score
    }

    /// Currently selected answer text
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    /// Progress through the quiz as a fraction in `(0, 1]`
    pub fn progress(&self) -> f64 {
        if self.complete {
            return 1.0;
        }
        (self.current_index + 1) as f64 / self.questions.len() as f64
    }

    /// Select an answer for the current question
    pub fn select(&mut self, answer: impl Into<String>) {
        if !self.complete {
            self.selected_answer = Some(answer.into());
        }
    }

    /// Select an answer by option index; out-of-range indices are ignored
    pub fn select_option(&mut self, option: usize) {
        if let Some(text) = self
            .current_question()
            .and_then(|q| q.options.get(option))
            .cloned()
        {
            self.selected_answer = Some(text);
        }
    }

    /// Score the selected answer and advance
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.complete {
            return SubmitOutcome::AlreadyComplete;
        }
        let Some(selected) = self.selected_answer.take() else {
            return SubmitOutcome::SelectionRequired;
        };

        let question = &self.questions[self.current_index];
        let correct_answer = question.correct_answer().to_string();
        let explanation = question.explanation.clone();
        let correct = selected == correct_answer;
        if correct {
            self.score += 1;
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        } else {
            self.complete = true;
        }

        SubmitOutcome::Answered(AnswerFeedback {
            correct,
            correct_answer,
            explanation,
            next: self.phase(),
        })
    }

    /// Performance band, available once complete
    pub fn grade(&self) -> Option<QuizGrade> {
        if !self.complete {
            return None;
        }
        let ratio = self.score as f64 / self.questions.len() as f64;
        Some(if ratio >= 0.7 {
            QuizGrade::Excellent
        } else if ratio >= 0.5 {
            QuizGrade::Good
        } else {
            QuizGrade::KeepStudying
        })
    }

    /// Return to the first question with a zero score
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.selected_answer = None;
        self.complete = false;
    }
}
