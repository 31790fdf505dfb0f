//! Session state machine
//!
//! This module contains the controller that owns one continuous play
//! session: the board and its category assignments, whose turn it is, the
//! round-win counters, and the single active challenge. Every transition is
//! a reaction to a user action (`select_cell`, `submit_answer`,
//! `dismiss_notice`) or to an alarm the controller scheduled earlier.

use std::fmt::Debug;

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use web_time::Duration;

use crate::{
    AlarmMessage,
    bank::config::QuestionBank,
    board::{Board, Team},
    challenge::{Answer, Challenge, Outcome},
    config::Options,
    view::BoardView,
};

/// Round wins per team
pub type Scores = EnumMap<Team, u32>;

/// Announcement shown when a round ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// The team completed a line
    RoundWinner(Team),
    /// The team reached the championship threshold; counters were reset
    Champion(Team),
    /// Every cell was claimed without a complete line
    Draw,
}

impl Notice {
    /// Text to display
    pub fn message(self) -> String {
        match self {
            Self::RoundWinner(team) => format!("🎉 {team} wins this round!"),
            Self::Champion(team) => format!("🏆 {team} is the champion!"),
            Self::Draw => "🤝 The board is full, nobody wins this round.".to_owned(),
        }
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum State {
    /// Created but not started
    Idle,
    /// Waiting for the acting team to pick a cell
    AwaitingCell,
    /// A challenge is open or showing its feedback
    Challenge(Box<Challenge>),
    /// A round just ended; waiting for the notice to be dismissed
    RoundOver(Notice),
}

/// How a view should draw one cell
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellMessage {
    /// Name of the assigned category
    pub category: Option<String>,
    /// Team that claimed the cell
    pub mark: Option<Team>,
}

/// Messages sent to the view to update its board, turn and score display
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum UpdateMessage {
    /// A team claimed a cell
    CellMarked {
        /// Claimed cell
        index: usize,
        /// Team that claimed it
        team: Team,
    },
    /// The board was cleared and categories reassigned
    BoardReset(Vec<CellMessage>),
    /// The team that acts next
    Turn(Team),
    /// New round-win counters
    Scores(Scores),
    /// The challenge on a cell closed
    ChallengeClosed {
        /// Cell that was challenged
        cell: usize,
    },
    /// A round ended
    Notice {
        /// What happened
        notice: Notice,
        /// Text to display
        message: String,
    },
    /// The round notice was acknowledged
    NoticeDismissed,
}

/// Messages that let a view with no prior state draw the session
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// The session has not started
    WaitingToStart,
    /// Everything outside the challenge
    Board {
        /// Cells in index order
        cells: Vec<CellMessage>,
        /// Acting team
        turn: Team,
        /// Round-win counters
        scores: Scores,
        /// Pending round notice
        notice: Option<Notice>,
    },
}

/// The game controller for one session
pub struct GameController {
    /// Categories and questions drawn from
    bank: QuestionBank,
    /// Session options
    options: Options,
    /// Cells with their categories and marks
    board: Board,
    /// Acting team
    turn: Team,
    /// Round wins per team
    scores: Scores,
    /// Current phase
    state: State,
    /// Sequence number of the last challenge opened
    challenge_count: u64,
    /// Round outcome waiting for the current challenge to close
    pending_notice: Option<Notice>,
    /// Source of all randomness
    rng: fastrand::Rng,
}

impl Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("options", &self.options)
            .field("turn", &self.turn)
            .field("scores", &self.scores)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// Convenience methods
impl GameController {
    fn cell_messages(&self) -> Vec<CellMessage> {
        self.board
            .cells()
            .iter()
            .map(|cell| CellMessage {
                category: cell
                    .category
                    .and_then(|index| self.bank.category(index))
                    .map(|category| category.name().to_owned()),
                mark: cell.mark,
            })
            .collect_vec()
    }

    /// Clears marks and draws fresh categories for every cell
    fn start_round(&mut self) {
        self.board.clear();
        self.board.assign_categories(self.bank.len(), &mut self.rng);
    }

    /// Counts a round win and decides which notice it earns
    fn record_win<V: BoardView>(&mut self, winner: Team, view: &V) {
        self.scores[winner] += 1;

        let notice = if self.scores[winner] >= self.options.rounds_to_win {
            self.scores = Scores::default();
            Notice::Champion(winner)
        } else {
            Notice::RoundWinner(winner)
        };

        tracing::info!(%winner, ?notice, "round won");

        view.send_message(&UpdateMessage::Scores(self.scores).into());
        self.pending_notice = Some(notice);
    }

    /// Places the acting team's mark and checks the board
    fn claim<V: BoardView>(&mut self, index: usize, team: Team, view: &V) {
        if !self.board.place(index, team) {
            return;
        }

        view.send_message(&UpdateMessage::CellMarked { index, team }.into());

        if let Some(winner) = self.board.winner(self.options.win_lines) {
            self.record_win(winner, view);
        } else if self.board.is_full() {
            tracing::info!("board full without a winner");
            self.pending_notice = Some(Notice::Draw);
        }
    }

    /// Ends the current challenge and passes the turn
    fn close_challenge<V: BoardView>(&mut self, view: &V) {
        let State::Challenge(challenge) = &self.state else {
            return;
        };
        let cell = challenge.cell();

        self.turn = self.turn.other();
        view.send_message(&UpdateMessage::ChallengeClosed { cell }.into());

        if let Some(notice) = self.pending_notice.take() {
            self.start_round();
            self.state = State::RoundOver(notice);
            view.send_message(&UpdateMessage::BoardReset(self.cell_messages()).into());
            view.send_message(
                &UpdateMessage::Notice {
                    notice,
                    message: notice.message(),
                }
                .into(),
            );
        } else {
            self.state = State::AwaitingCell;
        }

        view.send_message(&UpdateMessage::Turn(self.turn).into());
    }
}

impl GameController {
    /// Creates a controller seeded from the system's entropy
    ///
    /// # Arguments
    ///
    /// * `bank` - The question bank to draw from
    /// * `options` - Session options
    pub fn new(bank: QuestionBank, options: Options) -> Self {
        Self::with_rng(bank, options, fastrand::Rng::new())
    }

    /// Creates a controller drawing all randomness from `rng`
    ///
    /// Category assignment, question draws and option shuffles all come
    /// from this generator, so a seeded `rng` makes a session reproducible.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tictactoe_quiz::bank::config::{Category, QuestionBank};
    /// use tictactoe_quiz::bank::question::Question;
    /// use tictactoe_quiz::config::Options;
    /// use tictactoe_quiz::controller::GameController;
    ///
    /// let bank = QuestionBank::new(vec![Category::new(
    ///     "Geography",
    ///     vec![Question::type_answer("Capital of France?", "Paris")],
    /// )])
    /// .unwrap();
    /// let controller = GameController::with_rng(bank, Options::default(), fastrand::Rng::with_seed(1));
    /// ```
    pub fn with_rng(bank: QuestionBank, options: Options, rng: fastrand::Rng) -> Self {
        Self {
            bank,
            board: Board::new(options.board_size),
            options,
            turn: Team::A,
            scores: Scores::default(),
            state: State::Idle,
            challenge_count: 0,
            pending_notice: None,
            rng,
        }
    }

    /// The question bank
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Session options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Acting team
    pub fn turn(&self) -> Team {
        self.turn
    }

    /// Round-win counters
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Current phase
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The active challenge, if any
    pub fn challenge(&self) -> Option<&Challenge> {
        match &self.state {
            State::Challenge(challenge) => Some(challenge),
            _ => None,
        }
    }

    /// Starts the session
    ///
    /// Assigns categories, resets scores, gives Team A the first turn and
    /// sends a full snapshot. Does nothing if the session already started.
    pub fn play<V: BoardView>(&mut self, view: &V) {
        if !matches!(self.state, State::Idle) {
            return;
        }

        self.scores = Scores::default();
        self.turn = Team::A;
        self.start_round();
        self.state = State::AwaitingCell;

        tracing::info!(
            categories = self.bank.len(),
            cells = self.board.cells().len(),
            "session started"
        );

        self.sync(view);
    }

    /// Opens a challenge on a cell for the acting team
    ///
    /// Ignored if no cell choice is expected right now (a challenge is open
    /// or resolving, a round notice is pending, the session has not started),
    /// if the cell does not exist or is already marked, or if its category
    /// is missing or has no questions.
    ///
    /// # Arguments
    ///
    /// * `index` - The selected cell
    /// * `view` - Where render instructions go
    /// * `schedule_message` - Function to schedule delayed alarms
    pub fn select_cell<V: BoardView, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        index: usize,
        view: &V,
        schedule_message: S,
    ) {
        if !matches!(self.state, State::AwaitingCell) {
            tracing::debug!(index, "cell selection ignored outside of cell choice");
            return;
        }

        let Some(cell) = self.board.get(index) else {
            tracing::debug!(index, "cell selection ignored, no such cell");
            return;
        };

        if cell.mark.is_some() {
            tracing::debug!(index, "cell selection ignored, cell already claimed");
            return;
        }

        let Some(category) = cell.category.and_then(|category| self.bank.category(category))
        else {
            tracing::debug!(index, "cell selection ignored, category missing");
            return;
        };

        let Some(question) = category.pick(&mut self.rng) else {
            tracing::debug!(index, category = category.name(), "cell selection ignored, category empty");
            return;
        };

        self.challenge_count += 1;

        let challenge = Challenge::new(
            self.challenge_count,
            index,
            self.turn,
            category.name().to_owned(),
            question.clone(),
            self.options.countdown_seconds(),
            &mut self.rng,
        );

        tracing::debug!(
            index,
            team = %self.turn,
            challenge = self.challenge_count,
            "challenge opened"
        );

        challenge.play(view, schedule_message);
        self.state = State::Challenge(Box::new(challenge));
    }

    /// Handles the acting team's answer
    ///
    /// Ignored if no challenge is accepting answers. A correct answer claims
    /// the challenged cell and may end the round; either way the challenge
    /// shows feedback and closes after the feedback delay.
    ///
    /// # Arguments
    ///
    /// * `answer` - The chosen option or typed text
    /// * `view` - Where render instructions go
    /// * `schedule_message` - Function to schedule delayed alarms
    pub fn submit_answer<V: BoardView, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        answer: Answer,
        view: &V,
        schedule_message: S,
    ) {
        let State::Challenge(challenge) = &mut self.state else {
            tracing::debug!("answer ignored, no open challenge");
            return;
        };

        let Some(outcome) =
            challenge.receive_answer(answer, self.options.feedback_delay, view, schedule_message)
        else {
            tracing::debug!(challenge = challenge.id(), "answer ignored");
            return;
        };

        let (index, team) = (challenge.cell(), challenge.team());

        tracing::debug!(index, %team, ?outcome, "answer resolved");

        if outcome == Outcome::Correct {
            self.claim(index, team, view);
        }
    }

    /// Handles an alarm scheduled earlier
    ///
    /// Alarms belonging to a challenge other than the active one are stale
    /// and ignored.
    ///
    /// # Arguments
    ///
    /// * `message` - The alarm being delivered
    /// * `view` - Where render instructions go
    /// * `schedule_message` - Function to schedule further alarms
    pub fn receive_alarm<V: BoardView, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: AlarmMessage,
        view: &V,
        schedule_message: S,
    ) {
        match message {
            AlarmMessage::Challenge(alarm) => {
                let finished = match &mut self.state {
                    State::Challenge(challenge) if challenge.id() == alarm.challenge() => challenge
                        .receive_alarm(alarm, self.options.feedback_delay, view, schedule_message),
                    _ => {
                        tracing::debug!(?alarm, "stale alarm ignored");
                        false
                    }
                };

                if finished {
                    self.close_challenge(view);
                }
            }
        }
    }

    /// Acknowledges the round notice so play can continue
    pub fn dismiss_notice<V: BoardView>(&mut self, view: &V) {
        if let State::RoundOver(_) = self.state {
            self.state = State::AwaitingCell;
            view.send_message(&UpdateMessage::NoticeDismissed.into());
        }
    }

    /// Snapshot of everything outside the challenge
    pub fn state_message(&self) -> SyncMessage {
        match &self.state {
            State::Idle => SyncMessage::WaitingToStart,
            state => SyncMessage::Board {
                cells: self.cell_messages(),
                turn: self.turn,
                scores: self.scores,
                notice: match state {
                    State::RoundOver(notice) => Some(*notice),
                    _ => None,
                },
            },
        }
    }

    /// Sends full snapshots so a view can redraw from scratch
    pub fn sync<V: BoardView>(&self, view: &V) {
        view.send_state(&self.state_message().into());

        if let Some(challenge) = self.challenge() {
            view.send_state(&challenge.state_message().into());
        }
    }
}
