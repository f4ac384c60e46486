//! Wire types shared by the generation client and service

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of quiz questions requested
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Maximum number of concepts kept after normalization
pub const MAX_CONCEPTS: usize = 12;

/// Minimum number of questions kept by the truncation cap
pub const MIN_QUESTION_CAP: usize = 5;

/// Number of answer options every quiz question carries
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Which artifacts a generation call should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Quiz questions only
    Quiz,
    /// Concepts for the memory game
    Memory,
    /// Questions and concepts
    #[default]
    All,
}

impl ArtifactKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Quiz => "quiz",
            ArtifactKind::Memory => "memory",
            ArtifactKind::All => "all",
        }
    }

    /// Whether this kind asks for quiz questions
    pub fn wants_questions(&self) -> bool {
        matches!(self, ArtifactKind::Quiz | ArtifactKind::All)
    }

    /// Whether this kind asks for concepts
    pub fn wants_concepts(&self) -> bool {
        matches!(self, ArtifactKind::Memory | ArtifactKind::All)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiz" => Ok(ArtifactKind::Quiz),
            "memory" => Ok(ArtifactKind::Memory),
            "all" => Ok(ArtifactKind::All),
            other => Err(format!("unknown artifact kind '{}'", other)),
        }
    }
}

fn default_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

fn positive_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(u32::deserialize(deserializer)?.max(1))
}

/// Body of a generate-learning call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Source study material
    #[serde(default)]
    pub content: String,

    /// Requested artifact kind
    #[serde(rename = "type", default)]
    pub kind: ArtifactKind,

    /// Requested number of quiz questions
    #[serde(default = "default_count", deserialize_with = "positive_count")]
    pub count: u32,
}

impl GenerationRequest {
    /// Build a request, clamping the count to at least one
    pub fn new(content: impl Into<String>, kind: ArtifactKind, count: u32) -> Self {
        Self {
            content: content.into(),
            kind,
            count: count.max(1),
        }
    }

    /// Question cap applied during normalization: `max(count, 5)`
    pub fn question_cap(&self) -> usize {
        (self.count as usize).max(MIN_QUESTION_CAP)
    }
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// Question text
    pub question: String,
    /// Exactly four answer options
    pub options: Vec<String>,
    /// Index of the correct option
    pub correct_index: usize,
    /// Why the correct option is right
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Whether the question satisfies the four-option invariant
    pub fn is_valid(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == OPTIONS_PER_QUESTION
            && self.correct_index < self.options.len()
    }

    /// Text of the correct option
    pub fn correct_answer(&self) -> &str {
        self.options
            .get(self.correct_index)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Generated learning data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Quiz questions, if requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,

    /// Key concepts, if requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<String>>,
}

impl GenerationResult {
    /// Questions, or an empty slice when absent
    pub fn questions(&self) -> &[QuizQuestion] {
        self.questions.as_deref().unwrap_or_default()
    }

    /// Concepts, or an empty slice when absent
    pub fn concepts(&self) -> &[String] {
        self.concepts.as_deref().unwrap_or_default()
    }

    /// True when neither field carries any data
    pub fn is_empty(&self) -> bool {
        self.questions().is_empty() && self.concepts().is_empty()
    }

    /// Drop the fields a kind did not ask for
    pub fn retain_kind(mut self, kind: ArtifactKind) -> Self {
        if !kind.wants_questions() {
            self.questions = None;
        }
        if !kind.wants_concepts() {
            self.concepts = None;
        }
        self
    }
}

/// Error body returned by the generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"content": "some text"}"#).unwrap();
        assert_eq!(req.kind, ArtifactKind::All);
        assert_eq!(req.count, 5);
    }

    #[test]
    fn test_request_zero_count_clamped() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"content": "some text", "count": 0}"#).unwrap();
        assert_eq!(req.count, 1);
    }

    #[test]
    fn test_request_wire_names() {
        let req = GenerationRequest::new("text", ArtifactKind::Memory, 3);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "memory");
        assert_eq!(json["count"], 3);
        assert_eq!(json["content"], "text");
    }

    #[test]
    fn test_question_cap() {
        assert_eq!(GenerationRequest::new("", ArtifactKind::Quiz, 2).question_cap(), 5);
        assert_eq!(GenerationRequest::new("", ArtifactKind::Quiz, 9).question_cap(), 9);
        assert_eq!(GenerationRequest::new("", ArtifactKind::Quiz, 0).count, 1);
    }

    #[test]
    fn test_question_camel_case() {
        let q: QuizQuestion = serde_json::from_str(
            r#"{"question":"Q?","options":["a","b","c","d"],"correctIndex":2,"explanation":"e"}"#,
        )
        .unwrap();
        assert_eq!(q.correct_index, 2);
        assert_eq!(q.correct_answer(), "c");
        assert!(q.is_valid());
    }

    #[test]
    fn test_question_invalid() {
        let q = QuizQuestion {
            question: "Q?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_index: 0,
            explanation: String::new(),
        };
        assert!(!q.is_valid());

        let q = QuizQuestion {
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 4,
            ..q
        };
        assert!(!q.is_valid());
        assert_eq!(q.correct_answer(), "");
    }

    #[test]
    fn test_result_omits_absent_fields() {
        let result = GenerationResult {
            questions: None,
            concepts: Some(vec!["A".to_string()]),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"concepts":["A"]}"#);
    }

    #[test]
    fn test_retain_kind() {
        let result = GenerationResult {
            questions: Some(vec![]),
            concepts: Some(vec!["A".to_string()]),
        };
        let quiz = result.clone().retain_kind(ArtifactKind::Quiz);
        assert!(quiz.concepts.is_none());
        assert!(quiz.questions.is_some());

        let memory = result.clone().retain_kind(ArtifactKind::Memory);
        assert!(memory.questions.is_none());

        assert_eq!(result.clone().retain_kind(ArtifactKind::All), result);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("QUIZ".parse::<ArtifactKind>().unwrap(), ArtifactKind::Quiz);
        assert!("mindmap".parse::<ArtifactKind>().is_err());
    }
}
