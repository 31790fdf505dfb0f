//! Question bank: categories and the questions they hold
//!
//! The bank is loaded once from a JSON document, validated loosely, and
//! never mutated afterwards. Board cells refer to its categories by index.

pub mod config;
pub mod question;
