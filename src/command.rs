use thiserror::Error;
use tracing::{debug, warn};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  None,
  Save,
  TogglePause,
  Quit,
  /// Pick which instance is shown; single-view display only.
  SelectView,
}

/// Message and prompt channel of the front end.
pub trait Console {
  fn message(&mut self, msg: &str);

  /// Asks the user for a line of input. `None` when input is closed.
  fn prompt(&mut self, prompt: &str) -> Option<String>;
}

/// Effects a routed command may have on the session. Indices are zero-based.
pub trait CommandTarget {
  fn save_all(&mut self) -> Result<()>;
  fn save_one(&mut self, index: usize) -> Result<()>;
  fn toggle_pause_all(&mut self);
  fn toggle_pause_one(&mut self, index: usize);
  fn select(&mut self, index: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteContext {
  pub games: usize,
  pub single_view: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
  All,
  One(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
  #[error("not a number")]
  NotANumber,
  #[error("{0} is not between 0 and {1}")]
  OutOfRange(i64, usize),
}

pub const EXITING_MESSAGE: &str = "Exiting game...";
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input; please enter a number.";

/// Reads a selector typed by the user: `0` is every game, `1..=games` one game.
///
/// Negative numbers are numbers, just out of range.
pub fn parse_selection(input: &str, games: usize) -> std::result::Result<Selection, SelectionError> {
  let n: i64 = input.trim().parse().map_err(|_| SelectionError::NotANumber)?;
  match usize::try_from(n) {
    Ok(0) => Ok(Selection::All),
    Ok(k) if k <= games => Ok(Selection::One(k - 1)),
    _ => Err(SelectionError::OutOfRange(n, games)),
  }
}

/// Interprets commands against the current number of games.
///
/// Holds no simulation state; every effect goes through the [`CommandTarget`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRouter;

impl CommandRouter {
  pub fn new() -> Self {
    Self
  }

  pub fn process(
    &self,
    command: Command,
    ctx: RouteContext,
    target: &mut dyn CommandTarget,
    console: &mut dyn Console,
  ) -> Flow {
    debug!(?command, games = ctx.games, "routing command");

    if command == Command::Quit {
      console.message(EXITING_MESSAGE);
      return Flow::Stop;
    }
    if ctx.games == 0 {
      return Flow::Continue;
    }

    match command {
      Command::Save => self.save(ctx.games, target, console),
      Command::TogglePause => self.toggle_pause(ctx.games, target, console),
      Command::SelectView if ctx.single_view => self.select_view(ctx.games, target, console),
      _ => {}
    }
    Flow::Continue
  }

  fn save(&self, games: usize, target: &mut dyn CommandTarget, console: &mut dyn Console) {
    if games == 1 {
      report_save(target.save_one(0), "Game saved successfully.".to_owned(), console);
      return;
    }

    let prompt = format!(
      "Enter 0 to save all games in one file or a game number (1-{}) to save a specific game:", games);
    match ask(console, &prompt, games) {
      Ok(Selection::All) => {
        report_save(target.save_all(), "All games saved successfully.".to_owned(), console);
      }
      Ok(Selection::One(i)) => {
        report_save(target.save_one(i), format!("Game {} saved successfully.", i + 1), console);
      }
      Err(e) => reject(e, "Invalid selection for saving.", console),
    }
  }

  fn toggle_pause(&self, games: usize, target: &mut dyn CommandTarget, console: &mut dyn Console) {
    if games == 1 {
      target.toggle_pause_one(0);
      console.message("Game pause state toggled.");
      return;
    }

    let prompt = format!(
      "Enter 0 to toggle pause state for all games or a game number (1-{}) for a specific game:", games);
    match ask(console, &prompt, games) {
      Ok(Selection::All) => {
        target.toggle_pause_all();
        console.message("Toggled pause state for all games.");
      }
      Ok(Selection::One(i)) => {
        target.toggle_pause_one(i);
        console.message(&format!("Game {} pause state changed.", i + 1));
      }
      Err(e) => reject(e, "Invalid selection for toggling pause state.", console),
    }
  }

  /// Every bad answer gets the same message here, numeric or not.
  fn select_view(&self, games: usize, target: &mut dyn CommandTarget, console: &mut dyn Console) {
    let prompt = format!("Enter a game number (1-{}) to view:", games);
    match ask(console, &prompt, games) {
      Ok(Selection::One(i)) => {
        target.select(i);
        console.message(&format!("Now viewing game {}.", i + 1));
      }
      Ok(Selection::All) | Err(_) => {
        debug!("rejected view selection");
        console.message("Invalid selection for viewing.");
      }
    }
  }
}

fn ask(console: &mut dyn Console, prompt: &str, games: usize) -> std::result::Result<Selection, SelectionError> {
  match console.prompt(prompt) {
    Some(input) => parse_selection(&input, games),
    None => Err(SelectionError::NotANumber),
  }
}

fn reject(e: SelectionError, out_of_range: &str, console: &mut dyn Console) {
  debug!(error = %e, "rejected selection");
  match e {
    SelectionError::NotANumber => console.message(INVALID_INPUT_MESSAGE),
    SelectionError::OutOfRange(..) => console.message(out_of_range),
  }
}

fn report_save(result: Result<()>, success: String, console: &mut dyn Console) {
  match result {
    Ok(()) => console.message(&success),
    Err(e) => {
      warn!(error = %e, "save failed");
      console.message(&format!("Failed to save game: {}", e));
    }
  }
}
