//! The active challenge: one question posed to the acting team
//!
//! A challenge opens when a team selects an empty cell and lives until the
//! team answers or the countdown runs out. It then shows feedback for a
//! short delay before the controller closes it. Timing is driven by alarms
//! the challenge schedules through its host; every alarm carries the
//! challenge's sequence number so late alarms for a closed challenge can be
//! told apart from live ones.

use web_time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    bank::question::Question,
    board::Team,
    view::BoardView,
};

/// How a challenge ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The answer matched; the cell is claimed
    Correct,
    /// The answer did not match; the cell stays empty
    Wrong,
    /// Nobody answered before the countdown reached zero
    TimedOut,
}

impl Outcome {
    /// Feedback text shown while the challenge resolves
    pub fn feedback(self) -> &'static str {
        match self {
            Self::Correct => "✅ Correct!",
            Self::Wrong => "❌ Wrong!",
            Self::TimedOut => "⏰ Time's up! Passing to the next team.",
        }
    }
}

/// Current phase of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting an answer while the countdown runs
    Open,
    /// Showing feedback; further answers and ticks are ignored
    Resolving(Outcome),
}

/// An answer submitted by the acting team
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Answer {
    /// Index into the options as presented (after shuffling)
    Choice(usize),
    /// Free text, or the literal text of an option
    Text(String),
}

/// Alarms a challenge schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// One second of the countdown has passed
    Countdown {
        /// Sequence number of the challenge that scheduled the alarm
        challenge: u64,
    },
    /// The feedback delay is over; close the challenge
    Close {
        /// Sequence number of the challenge that scheduled the alarm
        challenge: u64,
    },
}

impl AlarmMessage {
    /// Sequence number of the challenge the alarm belongs to
    pub fn challenge(&self) -> u64 {
        match self {
            Self::Countdown { challenge } | Self::Close { challenge } => *challenge,
        }
    }
}

/// Messages sent to the view to update what it already shows
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum UpdateMessage {
    /// A challenge opened on a cell
    QuestionAnnouncement {
        /// Challenged cell
        cell: usize,
        /// Team that has to answer
        team: Team,
        /// Category name shown as the heading
        category: String,
        /// Question text
        prompt: String,
        /// Shuffled options, absent for free-text questions
        options: Option<Vec<String>>,
        /// Seconds on the countdown
        remaining: u64,
    },
    /// Seconds left to answer
    Countdown(u64),
    /// Result of the attempt, shown until the challenge closes
    Feedback {
        /// How the attempt ended
        outcome: Outcome,
        /// Text to display
        message: String,
    },
}

/// Messages that let a view with no prior state draw the challenge
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// The challenge is accepting answers
    QuestionAnnouncement {
        /// Challenged cell
        cell: usize,
        /// Team that has to answer
        team: Team,
        /// Category name shown as the heading
        category: String,
        /// Question text
        prompt: String,
        /// Shuffled options, absent for free-text questions
        options: Option<Vec<String>>,
        /// Seconds left on the countdown
        remaining: u64,
    },
    /// The challenge is showing feedback
    Feedback {
        /// Challenged cell
        cell: usize,
        /// Team that answered
        team: Team,
        /// How the attempt ended
        outcome: Outcome,
        /// Text to display
        message: String,
    },
}

/// Runtime state of one challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    id: u64,
    cell: usize,
    team: Team,
    category: String,
    question: Question,
    options: Option<Vec<String>>,
    remaining: u64,
    phase: Phase,
}

impl Challenge {
    /// Prepares a challenge, shuffling the question's options if it has any
    ///
    /// # Arguments
    ///
    /// * `id` - Sequence number stamped on every alarm this challenge schedules
    /// * `cell` - Board index being challenged
    /// * `team` - Team that must answer
    /// * `category` - Name of the cell's category
    /// * `question` - The drawn question
    /// * `countdown` - Whole seconds on the countdown
    /// * `rng` - Random source used to shuffle options
    pub fn new(
        id: u64,
        cell: usize,
        team: Team,
        category: String,
        question: Question,
        countdown: u64,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let options = question.shuffled_options(rng);
        Self {
            id,
            cell,
            team,
            category,
            question,
            options,
            remaining: countdown,
            phase: Phase::Open,
        }
    }

    /// Sequence number of this challenge
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Challenged cell
    pub fn cell(&self) -> usize {
        self.cell
    }

    /// Team that must answer
    pub fn team(&self) -> Team {
        self.team
    }

    /// Category name
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The question being asked
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Options in presentation order, `None` for free-text questions
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    /// Seconds left on the countdown
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Announces the question and starts the countdown
    pub fn play<V: BoardView, S: FnMut(crate::AlarmMessage, Duration)>(
        &self,
        view: &V,
        mut schedule_message: S,
    ) {
        view.send_message(
            &UpdateMessage::QuestionAnnouncement {
                cell: self.cell,
                team: self.team,
                category: self.category.clone(),
                prompt: self.question.prompt().to_owned(),
                options: self.options.clone(),
                remaining: self.remaining,
            }
            .into(),
        );

        schedule_message(
            AlarmMessage::Countdown { challenge: self.id }.into(),
            Duration::from_secs(1),
        );
    }

    /// Handles an answer from the acting team
    ///
    /// Answers are ignored unless the challenge is open; a choice index that
    /// does not name a presented option is ignored too.
    ///
    /// # Returns
    ///
    /// The outcome if the answer was accepted, `None` if it was ignored
    pub fn receive_answer<V: BoardView, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        answer: Answer,
        feedback_delay: Duration,
        view: &V,
        schedule_message: S,
    ) -> Option<Outcome> {
        if self.phase != Phase::Open {
            return None;
        }

        let text = match answer {
            Answer::Choice(index) => self.options.as_ref()?.get(index)?.clone(),
            Answer::Text(text) => text,
        };

        let outcome = if self.question.is_correct(&text) {
            Outcome::Correct
        } else {
            Outcome::Wrong
        };

        self.resolve(outcome, feedback_delay, view, schedule_message);

        Some(outcome)
    }

    /// Handles one of this challenge's alarms
    ///
    /// A countdown alarm ticks the timer down and schedules the next tick;
    /// the tick that reaches zero resolves the challenge as timed out. A close
    /// alarm ends a resolving challenge.
    ///
    /// # Returns
    ///
    /// `true` if the challenge is finished and should be closed
    pub fn receive_alarm<V: BoardView, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: AlarmMessage,
        feedback_delay: Duration,
        view: &V,
        mut schedule_message: S,
    ) -> bool {
        match (message, self.phase) {
            (AlarmMessage::Countdown { .. }, Phase::Open) => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.resolve(Outcome::TimedOut, feedback_delay, view, schedule_message);
                } else {
                    view.send_message(&UpdateMessage::Countdown(self.remaining).into());
                    schedule_message(
                        AlarmMessage::Countdown { challenge: self.id }.into(),
                        Duration::from_secs(1),
                    );
                }
                false
            }
            (AlarmMessage::Close { .. }, Phase::Resolving(_)) => true,
            _ => false,
        }
    }

    /// Snapshot of the challenge for a view with no prior state
    pub fn state_message(&self) -> SyncMessage {
        match self.phase {
            Phase::Open => SyncMessage::QuestionAnnouncement {
                cell: self.cell,
                team: self.team,
                category: self.category.clone(),
                prompt: self.question.prompt().to_owned(),
                options: self.options.clone(),
                remaining: self.remaining,
            },
            Phase::Resolving(outcome) => SyncMessage::Feedback {
                cell: self.cell,
                team: self.team,
                outcome,
                message: outcome.feedback().to_owned(),
            },
        }
    }

    fn resolve<V: BoardView, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        outcome: Outcome,
        feedback_delay: Duration,
        view: &V,
        mut schedule_message: S,
    ) {
        self.phase = Phase::Resolving(outcome);

        view.send_message(
            &UpdateMessage::Feedback {
                outcome,
                message: outcome.feedback().to_owned(),
            }
            .into(),
        );

        schedule_message(
            AlarmMessage::Close { challenge: self.id }.into(),
            feedback_delay,
        );
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_utils::RecordingView;

    fn free_text_challenge(countdown: u64) -> Challenge {
        Challenge::new(
            7,
            4,
            Team::A,
            "Geography".to_string(),
            Question::type_answer("Capital of France?", "Paris"),
            countdown,
            &mut fastrand::Rng::with_seed(1),
        )
    }

    fn choice_challenge() -> Challenge {
        Challenge::new(
            3,
            0,
            Team::B,
            "Science".to_string(),
            Question::multiple_choice("Red planet?", ["Venus", "Mars", "Jupiter"], "Mars"),
            60,
            &mut fastrand::Rng::with_seed(4),
        )
    }

    #[test]
    fn test_play_announces_and_schedules_countdown() {
        let challenge = free_text_challenge(60);
        let view = RecordingView::default();
        let mut alarms = Vec::new();

        challenge.play(&view, |alarm, duration| alarms.push((alarm, duration)));

        assert_eq!(
            alarms,
            vec![(
                crate::AlarmMessage::Challenge(AlarmMessage::Countdown { challenge: 7 }),
                Duration::from_secs(1)
            )]
        );
        assert!(matches!(
            view.updates().as_slice(),
            [crate::UpdateMessage::Challenge(UpdateMessage::QuestionAnnouncement {
                cell: 4,
                remaining: 60,
                options: None,
                ..
            })]
        ));
    }

    #[test]
    fn test_correct_text_answer() {
        let mut challenge = free_text_challenge(60);
        let view = RecordingView::default();
        let mut alarms = Vec::new();

        let outcome = challenge.receive_answer(
            Answer::Text("  PARIS ".to_string()),
            Duration::from_secs(1),
            &view,
            |alarm, duration| alarms.push((alarm, duration)),
        );

        assert_eq!(outcome, Some(Outcome::Correct));
        assert_eq!(challenge.phase(), Phase::Resolving(Outcome::Correct));
        assert_eq!(
            alarms,
            vec![(
                crate::AlarmMessage::Challenge(AlarmMessage::Close { challenge: 7 }),
                Duration::from_secs(1)
            )]
        );
    }

    #[test]
    fn test_wrong_answer() {
        let mut challenge = free_text_challenge(60);
        let view = RecordingView::default();

        let outcome = challenge.receive_answer(
            Answer::Text("Lyon".to_string()),
            Duration::from_secs(1),
            &view,
            |_, _| {},
        );

        assert_eq!(outcome, Some(Outcome::Wrong));
        assert!(view.updates().iter().any(|message| matches!(
            message,
            crate::UpdateMessage::Challenge(UpdateMessage::Feedback {
                outcome: Outcome::Wrong,
                ..
            })
        )));
    }

    #[test]
    fn test_second_answer_is_ignored() {
        let mut challenge = free_text_challenge(60);
        let view = RecordingView::default();
        let mut scheduled = 0;

        challenge.receive_answer(
            Answer::Text("Lyon".to_string()),
            Duration::from_secs(1),
            &view,
            |_, _| scheduled += 1,
        );
        let second = challenge.receive_answer(
            Answer::Text("Paris".to_string()),
            Duration::from_secs(1),
            &view,
            |_, _| scheduled += 1,
        );

        assert_eq!(second, None);
        assert_eq!(scheduled, 1);
        assert_eq!(challenge.phase(), Phase::Resolving(Outcome::Wrong));
    }

    #[test]
    fn test_choice_answer_uses_presented_order() {
        let mut challenge = choice_challenge();
        let view = RecordingView::default();
        let index = challenge
            .options()
            .unwrap()
            .iter()
            .position(|option| option == "Mars")
            .unwrap();

        let outcome =
            challenge.receive_answer(Answer::Choice(index), Duration::ZERO, &view, |_, _| {});

        assert_eq!(outcome, Some(Outcome::Correct));
    }

    #[test]
    fn test_choice_answer_out_of_range_is_ignored() {
        let mut challenge = choice_challenge();
        let view = RecordingView::default();

        let outcome =
            challenge.receive_answer(Answer::Choice(3), Duration::ZERO, &view, |_, _| {});

        assert_eq!(outcome, None);
        assert_eq!(challenge.phase(), Phase::Open);
    }

    #[test]
    fn test_choice_index_on_free_text_is_ignored() {
        let mut challenge = free_text_challenge(60);
        let view = RecordingView::default();

        let outcome =
            challenge.receive_answer(Answer::Choice(0), Duration::ZERO, &view, |_, _| {});

        assert_eq!(outcome, None);
    }

    #[test]
    fn test_choice_requires_exact_text() {
        let mut challenge = choice_challenge();
        let view = RecordingView::default();

        let outcome = challenge.receive_answer(
            Answer::Text("mars".to_string()),
            Duration::ZERO,
            &view,
            |_, _| {},
        );

        assert_eq!(outcome, Some(Outcome::Wrong));
    }

    #[test]
    fn test_countdown_ticks_and_reschedules() {
        let mut challenge = free_text_challenge(3);
        let view = RecordingView::default();
        let mut alarms = Vec::new();

        let finished = challenge.receive_alarm(
            AlarmMessage::Countdown { challenge: 7 },
            Duration::from_secs(1),
            &view,
            |alarm, duration| alarms.push((alarm, duration)),
        );

        assert!(!finished);
        assert_eq!(challenge.remaining(), 2);
        assert_eq!(
            alarms,
            vec![(
                crate::AlarmMessage::Challenge(AlarmMessage::Countdown { challenge: 7 }),
                Duration::from_secs(1)
            )]
        );
        assert_eq!(
            view.updates(),
            vec![crate::UpdateMessage::Challenge(UpdateMessage::Countdown(2))]
        );
    }

    #[test]
    fn test_countdown_reaching_zero_times_out() {
        let mut challenge = free_text_challenge(2);
        let view = RecordingView::default();
        let mut alarms = Vec::new();

        for _ in 0..2 {
            challenge.receive_alarm(
                AlarmMessage::Countdown { challenge: 7 },
                Duration::from_secs(1),
                &view,
                |alarm, duration| alarms.push((alarm, duration)),
            );
        }

        assert_eq!(challenge.phase(), Phase::Resolving(Outcome::TimedOut));
        assert_eq!(
            alarms.last(),
            Some(&(
                crate::AlarmMessage::Challenge(AlarmMessage::Close { challenge: 7 }),
                Duration::from_secs(1)
            ))
        );
    }

    #[test]
    fn test_countdown_ignored_while_resolving() {
        let mut challenge = free_text_challenge(60);
        let view = RecordingView::default();
        challenge.receive_answer(
            Answer::Text("Paris".to_string()),
            Duration::from_secs(1),
            &view,
            |_, _| {},
        );

        let finished = challenge.receive_alarm(
            AlarmMessage::Countdown { challenge: 7 },
            Duration::from_secs(1),
            &view,
            |_, _| panic!("no alarm expected"),
        );

        assert!(!finished);
        assert_eq!(challenge.remaining(), 60);
    }

    #[test]
    fn test_close_only_after_resolution() {
        let mut challenge = free_text_challenge(60);
        let view = RecordingView::default();

        assert!(!challenge.receive_alarm(
            AlarmMessage::Close { challenge: 7 },
            Duration::ZERO,
            &view,
            |_, _| {},
        ));

        challenge.receive_answer(
            Answer::Text("Paris".to_string()),
            Duration::ZERO,
            &view,
            |_, _| {},
        );

        assert!(challenge.receive_alarm(
            AlarmMessage::Close { challenge: 7 },
            Duration::ZERO,
            &view,
            |_, _| {},
        ));
    }

    #[test]
    fn test_state_message_follows_phase() {
        let mut challenge = free_text_challenge(60);
        let view = RecordingView::default();
        assert!(matches!(
            challenge.state_message(),
            SyncMessage::QuestionAnnouncement { remaining: 60, .. }
        ));

        challenge.receive_answer(
            Answer::Text("Rome".to_string()),
            Duration::ZERO,
            &view,
            |_, _| {},
        );

        assert_eq!(
            challenge.state_message(),
            SyncMessage::Feedback {
                cell: 4,
                team: Team::A,
                outcome: Outcome::Wrong,
                message: "❌ Wrong!".to_string(),
            }
        );
    }

    #[test]
    fn test_alarm_challenge_id() {
        assert_eq!(AlarmMessage::Countdown { challenge: 5 }.challenge(), 5);
        assert_eq!(AlarmMessage::Close { challenge: 9 }.challenge(), 9);
    }
}
