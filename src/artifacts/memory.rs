//! Memory-match game: paired concept cards and the flip state machine
//!
//! The board always holds [`PAIRS`] pairs. Concepts are deduplicated, capped,
//! and padded with `"Concept A"`, `"Concept B"`, ... labels.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

/// Number of pairs on every board
pub const PAIRS: usize = 6;

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCard {
    pub id: usize,
    pub content: String,
    pub is_flipped: bool,
    pub is_matched: bool,
}

/// Pick exactly [`PAIRS`] distinct labels from the concepts, padding as needed
pub fn board_labels(concepts: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut labels: Vec<String> = concepts
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_string()))
        .take(PAIRS)
        .map(str::to_string)
        .collect();

    let mut letter = b'A';
    while labels.len() < PAIRS {
        let placeholder = format!("Concept {}", letter as char);
        letter += 1;
        if !seen.contains(&placeholder) {
            seen.insert(placeholder.clone());
            labels.push(placeholder);
        }
    }
    labels
}

/// Build the unshuffled deck: cards `2k` and `2k + 1` carry label `k`
pub fn paired_cards(labels: &[String]) -> Vec<MemoryCard> {
    labels
        .iter()
        .enumerate()
        .flat_map(|(k, label)| {
            [2 * k, 2 * k + 1].map(|id| MemoryCard {
                id,
                content: label.clone(),
                is_flipped: false,
                is_matched: false,
            })
        })
        .collect()
}

/// Build a shuffled deck using the thread RNG
pub fn build_deck(concepts: &[String]) -> Vec<MemoryCard> {
    build_deck_with_rng(concepts, &mut rand::thread_rng())
}

/// Build a shuffled deck with a caller-supplied RNG
pub fn build_deck_with_rng<R: Rng + ?Sized>(concepts: &[String], rng: &mut R) -> Vec<MemoryCard> {
    let mut cards = paired_cards(&board_labels(concepts));
    cards.shuffle(rng);
    cards
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No unmatched card face up
    Idle,
    /// One card face up at this board position
    OneFlipped(usize),
    /// Two non-matching cards face up, waiting to be turned back
    AwaitingRevert(usize, usize),
    /// Every card matched
    Complete { moves: u32 },
}

/// Result of clicking a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Click had no effect
    Ignored,
    /// First card of an attempt turned up
    FirstFlip,
    /// Second card matched the first
    Matched { completed: bool },
    /// Second card did not match; call `resolve_mismatch` after the delay
    Mismatch { revert_after: Duration },
}

/// Serializable snapshot of a game for rendering
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView<'a> {
    pub cards: &'a [MemoryCard],
    pub moves: u32,
    pub complete: bool,
    pub mismatch_delay_ms: u64,
}

/// Memory-match game over one shuffled board
#[derive(Debug, Clone)]
pub struct MemoryGame {
    cards: Vec<MemoryCard>,
    phase: GamePhase,
    moves: u32,
    mismatch_delay: Duration,
}

impl MemoryGame {
    /// Start a game from concepts with the thread RNG
    pub fn new(concepts: &[String], mismatch_delay: Duration) -> Self {
        Self::from_cards(build_deck(concepts), mismatch_delay)
    }

    /// Start a game on an already-built board
    pub fn from_cards(cards: Vec<MemoryCard>, mismatch_delay: Duration) -> Self {
        Self {
            cards,
            phase: GamePhase::Idle,
            moves: 0,
            mismatch_delay,
        }
    }

    /// Cards in board order
    pub fn cards(&self) -> &[MemoryCard] {
        &self.cards
    }

    /// Current phase
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Pair attempts so far
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Delay before a mismatched pair turns back
    pub fn mismatch_delay(&self) -> Duration {
        self.mismatch_delay
    }

    /// Snapshot of the board for rendering
    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            cards: &self.cards,
            moves: self.moves,
            complete: self.is_complete(),
            mismatch_delay_ms: self.mismatch_delay.as_millis() as u64,
        }
    }

    /// Whether every card is matched
    pub fn is_complete(&self) -> bool {
        self.cards.iter().all(|c| c.is_matched)
    }

    /// Positions of face-up cards that are not yet matched
    pub fn flipped_positions(&self) -> Vec<usize> {
        match self.phase {
            GamePhase::OneFlipped(i) => vec![i],
            GamePhase::AwaitingRevert(i, j) => vec![i, j],
            _ => Vec::new(),
        }
    }

    /// Click the card at `position` on the board
    pub fn flip(&mut self, position: usize) -> FlipOutcome {
        let Some(card) = self.cards.get(position) else {
            return FlipOutcome::Ignored;
        };
        if card.is_flipped || card.is_matched {
            return FlipOutcome::Ignored;
        }

        match self.phase {
            GamePhase::AwaitingRevert(..) | GamePhase::Complete { .. } => FlipOutcome::Ignored,
            GamePhase::Idle => {
                self.cards[position].is_flipped = true;
                self.phase = GamePhase::OneFlipped(position);
                FlipOutcome::FirstFlip
            }
            GamePhase::OneFlipped(first) => {
                self.cards[position].is_flipped = true;
                self.moves += 1;

                if self.cards[first].content == self.cards[position].content {
                    self.cards[first].is_matched = true;
                    self.cards[position].is_matched = true;
                    let completed = self.is_complete();
                    self.phase = if completed {
                        tracing::debug!(moves = self.moves, "Memory game complete");
                        GamePhase::Complete { moves: self.moves }
                    } else {
                        GamePhase::Idle
                    };
                    FlipOutcome::Matched { completed }
                } else {
                    self.phase = GamePhase::AwaitingRevert(first, position);
                    FlipOutcome::Mismatch {
                        revert_after: self.mismatch_delay,
                    }
                }
            }
        }
    }

    /// Turn a mismatched pair face down again
    pub fn resolve_mismatch(&mut self) -> bool {
        let GamePhase::AwaitingRevert(i, j) = self.phase else {
            return false;
        };
        self.cards[i].is_flipped = false;
        self.cards[j].is_flipped = false;
        self.phase = GamePhase::Idle;
        true
    }

    /// Wait out the mismatch delay, then turn the pair back
    pub async fn settle(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::AwaitingRevert(..)) {
            return false;
        }
        tokio::time::sleep(self.mismatch_delay).await;
        self.resolve_mismatch()
    }

    /// Reshuffle the board and clear all progress
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for card in &mut self.cards {
            card.is_flipped = false;
            card.is_matched = false;
        }
        self.cards.shuffle(rng);
        self.phase = GamePhase::Idle;
        self.moves = 0;
    }
}
