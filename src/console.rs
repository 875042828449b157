use std::fmt::Write as _;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::warn;
use multilife::command::{Command, Console};
use multilife::manager::{Frame, InputHandler, Renderer, SaveSelector};
use multilife::store::SaveFile;

/// Lines typed on stdin, read on a background thread.
#[derive(Clone)]
pub struct Lines(Rc<Receiver<String>>);

impl Lines {
  pub fn spawn() -> Self {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
      for line in io::stdin().lock().lines() {
        match line {
          Ok(line) => if tx.send(line).is_err() { break },
          Err(e) => {
            warn!(error = %e, "stdin closed");
            break;
          }
        }
      }
    });
    Self(Rc::new(rx))
  }

  /// Blocks for the next line; `None` once stdin is closed.
  fn next(&self) -> Option<String> {
    self.0.recv().ok()
  }

  fn ask(&self, prompt: &str) -> Option<String> {
    print_out(&format!("{}\n", prompt));
    self.next()
  }
}

fn print_out(text: &str) {
  let mut out = io::stdout().lock();
  if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
    warn!(error = %e, "cannot write to stdout");
  }
}

pub fn key_command(line: &str) -> Command {
  match line.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
    Some('s') => Command::Save,
    Some('p') => Command::TogglePause,
    Some('v') => Command::SelectView,
    Some('q') => Command::Quit,
    _ => Command::None,
  }
}

pub fn format_frame(frame: &Frame<'_>) -> String {
  let mut out = String::new();
  for game in &frame.games {
    let _ = write!(out, "ID:{}|I:{}|LC:{}", game.id, game.iteration, game.living_cells);
    if game.paused {
      out.push_str(" [paused]");
    }
    out.push('\n');
    out.push_str(&game.field.debug());
    out.push_str("\n\n");
  }
  let _ = writeln!(out, "Active: {} | Living cells: {}", frame.active_games, frame.total_living_cells);

  let keys = if frame.single_view { "[s]ave [p]ause [v]iew [q]uit" } else { "[s]ave [p]ause [q]uit" };
  out.push_str(keys);
  out.push('\n');
  out
}

pub struct TextRenderer {
  lines: Lines,
  clear: bool,
}

impl TextRenderer {
  pub fn new(lines: Lines) -> Self {
    Self { lines, clear: io::stdout().is_terminal() }
  }
}

impl Console for TextRenderer {
  fn message(&mut self, msg: &str) {
    print_out(&format!("{}\n", msg));
  }

  fn prompt(&mut self, prompt: &str) -> Option<String> {
    self.lines.ask(prompt)
  }
}

impl Renderer for TextRenderer {
  fn render(&mut self, frame: &Frame<'_>) {
    let mut text = String::new();
    if self.clear {
      text.push_str("\x1b[2J\x1b[H");
    }
    text.push_str(&format_frame(frame));
    print_out(&text);
  }
}

pub struct KeyInput {
  lines: Lines,
}

impl KeyInput {
  pub fn new(lines: Lines) -> Self {
    Self { lines }
  }
}

impl InputHandler for KeyInput {
  fn command(&mut self) -> Command {
    match self.lines.0.try_recv() {
      Ok(line) => key_command(&line),
      Err(TryRecvError::Empty) => Command::None,
      Err(TryRecvError::Disconnected) => Command::Quit,
    }
  }
}

pub struct PromptSelector {
  lines: Lines,
}

impl PromptSelector {
  pub fn new(lines: Lines) -> Self {
    Self { lines }
  }
}

impl SaveSelector for PromptSelector {
  fn select(&mut self, saves: &[SaveFile]) -> Option<PathBuf> {
    let mut list = String::from("Saved games:\n");
    for (i, save) in saves.iter().enumerate() {
      let _ = writeln!(list, "{}. {}", i + 1, save.file_name());
    }
    print_out(&list);

    let answer = self.lines.ask("Enter the number of the save to load:")?;
    let n: usize = answer.trim().parse().ok()?;
    n.checked_sub(1).and_then(|i| saves.get(i)).map(|save| save.path.clone())
  }
}
