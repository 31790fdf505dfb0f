//! Terminal front-end for the tic-tac-toe quiz
//!
//! Reads commands from stdin, prints the board to stdout and delivers the
//! controller's alarms from a tokio timer. Configuration comes from the
//! environment (a `.env` file is honored):
//!
//! * `QUIZ_QUESTIONS` - question bank JSON (or the first argument); a small
//!   built-in bank is used otherwise
//! * `QUIZ_OPTIONS` - optional session options JSON
//! * `QUIZ_PREFERENCES` - display preference file, `preferences.json` by default

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

use std::cell::{Cell, RefCell};

use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_time::Duration;

use tictactoe_quiz::{
    AlarmMessage, SyncMessage, UpdateMessage,
    bank::{self, config::QuestionBank},
    board::Team,
    challenge::{self, Answer},
    config::{self, Options},
    controller::{self, CellMessage, GameController, Scores},
    preferences::{self, DisplayMode, PreferenceStore},
    view::BoardView,
};

const BUILTIN_QUESTIONS: &str = include_str!("../assets/questions.json");

#[derive(Error, Debug)]
enum StartupError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Bank(#[from] bank::config::Error),
    #[error(transparent)]
    Options(#[from] config::Error),
    #[error(transparent)]
    Preferences(#[from] preferences::Error),
    #[error("stdin: {0}")]
    Stdin(#[from] std::io::Error),
}

fn read_file(path: &str) -> Result<String, StartupError> {
    std::fs::read_to_string(path).map_err(|source| StartupError::Read {
        path: path.to_owned(),
        source,
    })
}

/// Prints render instructions, keeping a copy of the cells to redraw the grid
struct TerminalView {
    cells: RefCell<Vec<CellMessage>>,
    mode: Cell<DisplayMode>,
}

impl TerminalView {
    fn new(mode: DisplayMode) -> Self {
        Self {
            cells: RefCell::new(Vec::new()),
            mode: Cell::new(mode),
        }
    }

    fn set_mode(&self, mode: DisplayMode) {
        self.mode.set(mode);
    }

    fn paint(&self, team: Team) -> String {
        let color = match (self.mode.get(), team) {
            (DisplayMode::Light, Team::A) => "34",
            (DisplayMode::Light, Team::B) => "31",
            (DisplayMode::Dark, Team::A) => "96",
            (DisplayMode::Dark, Team::B) => "95",
        };
        format!("\x1b[1;{color}m{}\x1b[0m", team.marker())
    }

    fn draw_board(&self) {
        let cells = self.cells.borrow();
        let side = cells.len().isqrt().max(1);
        let (open, close) = match self.mode.get() {
            DisplayMode::Light => ("", ""),
            DisplayMode::Dark => ("\x1b[97;40m", "\x1b[0m"),
        };

        println!();
        for (row_index, row) in cells.chunks(side).enumerate() {
            let line = row
                .iter()
                .enumerate()
                .map(|(offset, cell)| {
                    let number = row_index * side + offset + 1;
                    match cell.mark {
                        Some(team) => format!("{number:>2} {}{:14}", self.paint(team), ""),
                        None => format!(
                            "{number:>2} {:<15}",
                            cell.category.as_deref().unwrap_or("-")
                        ),
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ");
            println!("{open}{line}{close}");
        }
        println!();
    }

    fn print_turn(team: Team) {
        println!("{team} ({}) picks a cell.", team.marker());
    }

    fn print_scores(scores: Scores) {
        println!("Rounds won: Team A {} - {} Team B", scores[Team::A], scores[Team::B]);
    }

    fn print_question(category: &str, team: Team, prompt: &str, options: Option<&[String]>, remaining: u64) {
        println!("[{category}] {team}, {remaining}s to answer:");
        println!("  {prompt}");
        match options {
            Some(options) => {
                for (number, option) in options.iter().enumerate() {
                    println!("  {}. {option}", number + 1);
                }
            }
            None => println!("  (type your answer)"),
        }
    }
}

impl BoardView for TerminalView {
    fn send_message(&self, message: &UpdateMessage) {
        match message {
            UpdateMessage::Game(message) => match message {
                controller::UpdateMessage::CellMarked { index, team } => {
                    if let Some(cell) = self.cells.borrow_mut().get_mut(*index) {
                        cell.mark = Some(*team);
                    }
                    self.draw_board();
                }
                controller::UpdateMessage::BoardReset(cells) => {
                    *self.cells.borrow_mut() = cells.clone();
                }
                controller::UpdateMessage::Turn(team) => Self::print_turn(*team),
                controller::UpdateMessage::Scores(scores) => Self::print_scores(*scores),
                controller::UpdateMessage::ChallengeClosed { .. } => {}
                controller::UpdateMessage::Notice { message, .. } => {
                    println!("{message} (type `ok` to continue)");
                }
                controller::UpdateMessage::NoticeDismissed => self.draw_board(),
            },
            UpdateMessage::Challenge(message) => match message {
                challenge::UpdateMessage::QuestionAnnouncement {
                    team,
                    category,
                    prompt,
                    options,
                    remaining,
                    ..
                } => Self::print_question(category, *team, prompt, options.as_deref(), *remaining),
                challenge::UpdateMessage::Countdown(remaining) => {
                    if remaining % 10 == 0 || *remaining <= 5 {
                        println!("  {remaining}s left");
                    }
                }
                challenge::UpdateMessage::Feedback { message, .. } => println!("{message}"),
            },
        }
    }

    fn send_state(&self, state: &SyncMessage) {
        match state {
            SyncMessage::Game(controller::SyncMessage::WaitingToStart) => {}
            SyncMessage::Game(controller::SyncMessage::Board {
                cells,
                turn,
                scores,
                notice,
            }) => {
                *self.cells.borrow_mut() = cells.clone();
                self.draw_board();
                Self::print_scores(*scores);
                match notice {
                    Some(notice) => println!("{} (type `ok` to continue)", notice.message()),
                    None => Self::print_turn(*turn),
                }
            }
            SyncMessage::Challenge(challenge::SyncMessage::QuestionAnnouncement {
                team,
                category,
                prompt,
                options,
                remaining,
                ..
            }) => Self::print_question(category, *team, prompt, options.as_deref(), *remaining),
            SyncMessage::Challenge(challenge::SyncMessage::Feedback { message, .. }) => {
                println!("{message}");
            }
        }
    }
}

/// Schedules an alarm as a sleeping task that posts back into the event loop
fn scheduler(
    sender: &mpsc::UnboundedSender<AlarmMessage>,
) -> impl FnMut(AlarmMessage, Duration) + '_ {
    move |alarm, duration| {
        let sender = sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // The receiver only closes when the loop exits.
            let _ = sender.send(alarm);
        });
    }
}

/// A line typed by the players
enum Command {
    Quit,
    Dismiss,
    ToggleTheme,
    Show,
    Input(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "" => None,
            "quit" | "q" => Some(Self::Quit),
            "ok" => Some(Self::Dismiss),
            "theme" => Some(Self::ToggleTheme),
            "show" => Some(Self::Show),
            _ => Some(Self::Input(line.to_owned())),
        }
    }
}

/// Reads a 1-based option number when it names a presented option, the text otherwise
fn answer_for(input: String, option_count: usize) -> Answer {
    match input.parse::<usize>() {
        Ok(number) if (1..=option_count).contains(&number) => Answer::Choice(number - 1),
        _ => Answer::Text(input),
    }
}

fn load_bank() -> Result<QuestionBank, StartupError> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QUIZ_QUESTIONS").ok());

    let bank = match path {
        Some(path) => {
            tracing::info!(%path, "loading question bank");
            QuestionBank::from_json(&read_file(&path)?)?
        }
        None => {
            tracing::info!("using the built-in question bank");
            QuestionBank::from_json(BUILTIN_QUESTIONS)?
        }
    };

    Ok(bank)
}

fn load_options() -> Result<Options, StartupError> {
    match std::env::var("QUIZ_OPTIONS") {
        Ok(path) => Ok(Options::from_json(&read_file(&path)?)?),
        Err(_) => Ok(Options::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), StartupError> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tictactoe_quiz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let bank = load_bank()?;
    let options = load_options()?;
    let mut store = PreferenceStore::load(
        std::env::var("QUIZ_PREFERENCES").unwrap_or_else(|_| "preferences.json".to_owned()),
    )?;

    let view = TerminalView::new(store.mode());
    let mut controller = GameController::new(bank, options);
    let (sender, mut alarms) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{} categories, {side}x{side} board, {}s per question.",
        controller.bank().len(),
        controller.options().countdown_seconds(),
        side = controller.board().size().side(),
    );
    println!("Commands: a cell number, an option number or answer text, `ok`, `show`, `theme`, `quit`.");
    controller.play(&view);

    loop {
        tokio::select! {
            Some(alarm) = alarms.recv() => {
                controller.receive_alarm(alarm, &view, scheduler(&sender));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match Command::parse(&line) {
                    None => {}
                    Some(Command::Quit) => break,
                    Some(Command::Dismiss) => controller.dismiss_notice(&view),
                    Some(Command::Show) => controller.sync(&view),
                    Some(Command::ToggleTheme) => {
                        match store.toggle() {
                            Ok(mode) => view.set_mode(mode),
                            Err(error) => tracing::warn!(%error, "could not save display preference"),
                        }
                        controller.sync(&view);
                    }
                    Some(Command::Input(input)) => {
                        let option_count = controller
                            .challenge()
                            .map(|open| open.options().map_or(0, <[String]>::len));

                        match option_count {
                            Some(count) => {
                                let answer = answer_for(input, count);
                                controller.submit_answer(answer, &view, scheduler(&sender));
                            }
                            None => match input.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                                Some(index) => controller.select_cell(index, &view, scheduler(&sender)),
                                None => tracing::debug!(%input, "not a cell number"),
                            },
                        }
                    }
                }
            }
        }
    }

    tracing::info!("session ended");
    Ok(())
}
