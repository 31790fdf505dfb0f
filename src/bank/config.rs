//! Question bank configuration and loading
//!
//! This module defines the `QuestionBank` and `Category` structures read
//! from the static JSON question document, along with the errors that can
//! occur while loading it.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::question::Question;
use crate::constants::bank::{MAX_CATEGORY_COUNT, MAX_CATEGORY_NAME_LENGTH, MAX_QUESTION_COUNT};

/// Errors that can occur while loading a question bank
#[derive(Error, Debug)]
pub enum Error {
    /// The document is not valid JSON or does not have the expected shape
    #[error("malformed question bank: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The document parsed but breaks a limit
    #[error("invalid question bank: {0}")]
    Invalid(#[from] garde::Report),
}

/// A named group of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Category {
    /// Display name, shown on the cells assigned to this category
    #[garde(length(chars, min = 1, max = MAX_CATEGORY_NAME_LENGTH))]
    name: String,
    /// Questions that can be drawn for this category
    #[garde(length(max = MAX_QUESTION_COUNT), dive)]
    questions: Vec<Question>,
}

impl Category {
    /// Creates a category
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }

    /// The category's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All questions in this category
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Draws one question uniformly at random, `None` if the category is empty
    pub fn pick(&self, rng: &mut fastrand::Rng) -> Option<&Question> {
        if self.questions.is_empty() {
            None
        } else {
            self.questions.get(rng.usize(..self.questions.len()))
        }
    }
}

/// The complete, read-only set of categories for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestionBank {
    #[garde(length(min = 1, max = MAX_CATEGORY_COUNT), dive)]
    categories: Vec<Category>,
}

impl QuestionBank {
    /// Builds and validates a bank from categories
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if the bank is empty or breaks a length limit.
    pub fn new(categories: Vec<Category>) -> Result<Self, Error> {
        let bank = Self { categories };
        bank.validate()?;
        Ok(bank)
    }

    /// Parses and validates a bank from its JSON document
    ///
    /// # Errors
    ///
    /// Returns `Error::Malformed` for unparseable input and `Error::Invalid`
    /// if the parsed bank breaks a limit.
    pub fn from_json(document: &str) -> Result<Self, Error> {
        let bank: Self = serde_json::from_str(document)?;
        bank.validate()?;
        tracing::debug!(categories = bank.len(), "loaded question bank");
        Ok(bank)
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the bank has no categories
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns the category at `index`
    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// All categories in document order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}
