//! Flash-card deck derived from quiz questions

use crate::error::{Error, Result};
use crate::generation::QuizQuestion;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashCard {
    pub question: String,
    pub answer: String,
    pub explanation: String,
}

impl From<&QuizQuestion> for FlashCard {
    fn from(q: &QuizQuestion) -> Self {
        Self {
            question: q.question.clone(),
            answer: q.correct_answer().to_string(),
            explanation: q.explanation.clone(),
        }
    }
}

/// A deck with a cursor and a face-up/face-down flag
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashDeck {
    cards: Vec<FlashCard>,
    current: usize,
    is_flipped: bool,
}

impl FlashDeck {
    pub fn new(questions: &[QuizQuestion]) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::NoQuestionsFound);
        }
        Ok(Self {
            cards: questions.iter().map(FlashCard::from).collect(),
            current: 0,
            is_flipped: false,
        })
    }

    pub fn cards(&self) -> &[FlashCard] {
        &self.cards
    }

    pub fn current(&self) -> &FlashCard {
        &self.cards[self.current]
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    /// Toggle between question and answer side
    pub fn flip(&mut self) {
        self.is_flipped = !self.is_flipped;
    }

    /// Move forward; returns false at the last card
    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.cards.len() {
            return false;
        }
        self.current += 1;
        self.is_flipped = false;
        true
    }

    /// Move back; returns false at the first card
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.is_flipped = false;
        true
    }
}
