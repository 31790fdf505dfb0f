//! Question records and answer matching
//!
//! A question is either multiple choice (the team picks one of several
//! options, compared exactly) or type answer (the team enters free text,
//! compared after trimming and ignoring case).

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants::question::{MAX_ANSWER_LENGTH, MAX_OPTION_COUNT, MAX_PROMPT_LENGTH};

/// How a question is answered
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub enum QuestionKind {
    /// Pick one of the listed options
    MultipleChoice(
        #[garde(length(min = 1, max = MAX_OPTION_COUNT), inner(length(chars, max = MAX_ANSWER_LENGTH)))]
        Vec<String>,
    ),
    /// Type the answer as free text
    TypeAnswer,
}

/// A single question from the bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(from = "QuestionSerde", into = "QuestionSerde")]
pub struct Question {
    /// What is being asked
    #[garde(length(chars, min = 1, max = MAX_PROMPT_LENGTH))]
    prompt: String,
    /// Options or free-text marker
    #[garde(dive)]
    kind: QuestionKind,
    /// The expected answer
    #[garde(length(chars, max = MAX_ANSWER_LENGTH))]
    correct: String,
}

/// On-disk kind marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindTag {
    Choice,
    Input,
}

/// On-disk representation: `{question, correct, options?, type?}`
#[derive(Serialize, Deserialize)]
struct QuestionSerde {
    question: String,
    correct: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<KindTag>,
}

impl From<QuestionSerde> for Question {
    /// An explicit `"type": "input"` or a missing option list means free text
    fn from(serde: QuestionSerde) -> Self {
        let QuestionSerde {
            question,
            correct,
            options,
            kind,
        } = serde;
        let kind = match kind {
            Some(KindTag::Input) => QuestionKind::TypeAnswer,
            None if options.is_empty() => QuestionKind::TypeAnswer,
            Some(KindTag::Choice) | None => QuestionKind::MultipleChoice(options),
        };
        Self {
            prompt: question,
            kind,
            correct,
        }
    }
}

impl From<Question> for QuestionSerde {
    fn from(question: Question) -> Self {
        let Question {
            prompt,
            kind,
            correct,
        } = question;
        let (options, kind) = match kind {
            QuestionKind::MultipleChoice(options) => (options, None),
            QuestionKind::TypeAnswer => (Vec::new(), Some(KindTag::Input)),
        };
        Self {
            question: prompt,
            correct,
            options,
            kind,
        }
    }
}

/// Normalizes free text for comparison: surrounding whitespace trimmed, lowercased
fn clean_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

impl Question {
    /// Creates a multiple choice question
    pub fn multiple_choice(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            kind: QuestionKind::MultipleChoice(options.into_iter().map(Into::into).collect()),
            correct: correct.into(),
        }
    }

    /// Creates a free-text question
    pub fn type_answer(prompt: impl Into<String>, correct: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            kind: QuestionKind::TypeAnswer,
            correct: correct.into(),
        }
    }

    /// The question text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// How the question is answered
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// The expected answer
    pub fn correct(&self) -> &str {
        &self.correct
    }

    /// Checks a submitted answer
    ///
    /// Multiple choice answers must equal the correct answer exactly; typed
    /// answers match case-insensitively after trimming whitespace.
    pub fn is_correct(&self, answer: &str) -> bool {
        match self.kind {
            QuestionKind::MultipleChoice(_) => answer == self.correct,
            QuestionKind::TypeAnswer => clean_answer(answer) == clean_answer(&self.correct),
        }
    }

    /// Options in a fresh random order, or `None` for free-text questions
    pub fn shuffled_options(&self, rng: &mut fastrand::Rng) -> Option<Vec<String>> {
        match &self.kind {
            QuestionKind::MultipleChoice(options) => {
                let mut options = options.clone();
                rng.shuffle(&mut options);
                Some(options)
            }
            QuestionKind::TypeAnswer => None,
        }
    }
}
