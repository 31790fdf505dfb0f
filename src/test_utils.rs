//! Shared helpers for unit tests

use std::cell::RefCell;

use crate::{
    SyncMessage, UpdateMessage,
    bank::{
        config::{Category, QuestionBank},
        question::Question,
    },
    view::BoardView,
};

/// View that records everything it is sent
#[derive(Debug, Default)]
pub struct RecordingView {
    updates: RefCell<Vec<UpdateMessage>>,
    states: RefCell<Vec<SyncMessage>>,
}

impl RecordingView {
    pub fn updates(&self) -> Vec<UpdateMessage> {
        self.updates.borrow().clone()
    }

    pub fn states(&self) -> Vec<SyncMessage> {
        self.states.borrow().clone()
    }

    pub fn clear(&self) {
        self.updates.borrow_mut().clear();
        self.states.borrow_mut().clear();
    }
}

impl BoardView for RecordingView {
    fn send_message(&self, message: &UpdateMessage) {
        self.updates.borrow_mut().push(message.clone());
    }

    fn send_state(&self, state: &SyncMessage) {
        self.states.borrow_mut().push(state.clone());
    }
}

/// A bank with one category holding a single free-text question answered "Paris"
pub fn single_question_bank() -> QuestionBank {
    QuestionBank::new(vec![Category::new(
        "Geography",
        vec![Question::type_answer("Capital of France?", "Paris")],
    )])
    .expect("test bank is valid")
}
