use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use multilife::manager::{Frame, InputHandler, Renderer, SaveSelector};
use multilife::{
  Command, Config, Console, Field, FileManager, GameInstance, JsonFileManager, MultiGameManager,
  Phase, SaveFile, StartMode,
};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Screen {
  answers: VecDeque<String>,
  messages: Vec<String>,
  frames: Vec<String>,
}

impl Console for Screen {
  fn message(&mut self, msg: &str) {
    self.messages.push(msg.to_owned());
  }

  fn prompt(&mut self, _: &str) -> Option<String> {
    self.answers.pop_front()
  }
}

impl Renderer for Screen {
  fn render(&mut self, frame: &Frame<'_>) {
    let games = frame.games.iter()
      .map(|g| format!("{}:{}{}", g.id, g.iteration, if g.paused { "p" } else { "" }))
      .collect::<Vec<_>>()
      .join(" ");
    self.frames.push(format!("{} | active {}", games, frame.active_games));
  }
}

struct Script(VecDeque<Command>);

impl InputHandler for Script {
  fn command(&mut self) -> Command {
    self.0.pop_front().unwrap_or(Command::Quit)
  }
}

struct Latest;

impl SaveSelector for Latest {
  fn select(&mut self, saves: &[SaveFile]) -> Option<PathBuf> {
    saves.last().map(|save| save.path.clone())
  }
}

fn manager(dir: &Path, commands: &[Command], answers: &[&str]) -> MultiGameManager<Screen, Script, Latest, JsonFileManager> {
  let config = Config {
    save_dir: dir.to_owned(),
    frame_delay_ms: 0,
    seed: Some(1),
    ..Config::default()
  };
  let screen = Screen {
    answers: answers.iter().map(|s| s.to_string()).collect(),
    ..Screen::default()
  };
  MultiGameManager::new(config, screen, Script(commands.iter().copied().collect()), Latest, JsonFileManager::new())
}

#[test]
fn pause_save_and_resume() {
  let tmp = tempfile::tempdir().unwrap();
  let dir = tmp.path().join("Saves");

  let mut first = manager(&dir, &[
    Command::None,
    Command::TogglePause,
    Command::None,
    Command::Save,
  ], &["2", "2"]);
  first.start(StartMode::New { games: 3, field_size: 10 }).unwrap();

  assert_eq!(first.phase(), Phase::Terminated);
  assert_eq!(first.renderer().frames, vec![
    "1:0 2:0 3:0 | active 3",
    "1:1 2:1p 3:1 | active 2",
    "1:2 2:1p 3:2 | active 2",
    "1:3 2:1p 3:3 | active 2",
  ]);
  assert_eq!(first.renderer().messages, vec![
    "Game 2 pause state changed.",
    "Game 2 saved successfully.",
    "Exiting game...",
  ]);

  let saves = JsonFileManager::new().list_saves(&dir).unwrap();
  assert_eq!(saves.iter().map(SaveFile::file_name).collect::<Vec<_>>(), vec!["Game1.json"]);

  let mut second = manager(&dir, &[Command::None], &[]);
  second.setup(StartMode::Load { path: None }).unwrap();
  let games = second.session().games();
  assert_eq!(games.len(), 1);
  assert_eq!(games[0].iteration(), 1);
  // game 2 stayed paused after the save, so its field is still the saved one
  assert_eq!(games[0].field(), first.session().games()[1].field());

  second.run();
  assert_eq!(second.renderer().frames, vec!["1:1 | active 1"]);
  assert_eq!(second.session().games()[0].iteration(), 2);
}

#[test]
fn quit_is_immediate() {
  let tmp = tempfile::tempdir().unwrap();
  let mut m = manager(tmp.path(), &[Command::Quit, Command::Save], &[]);
  m.start(StartMode::New { games: 2, field_size: 5 }).unwrap();

  assert!(m.renderer().frames.is_empty());
  assert!(m.session().games().iter().all(|g| g.iteration() == 0));
  assert_eq!(m.renderer().messages, vec!["Exiting game..."]);
}

#[test]
fn bad_selection_changes_nothing() {
  let tmp = tempfile::tempdir().unwrap();
  let mut m = manager(tmp.path(), &[Command::TogglePause, Command::Save], &["7", "x"]);
  m.start(StartMode::New { games: 2, field_size: 5 }).unwrap();

  assert!(m.session().games().iter().all(|g| !g.is_paused()));
  assert!(JsonFileManager::new().list_saves(tmp.path()).unwrap().is_empty());
  assert_eq!(m.renderer().messages, vec![
    "Invalid selection for toggling pause state.",
    "Invalid input; please enter a number.",
    "Exiting game...",
  ]);
}

#[test]
fn load_explicit_file() {
  let tmp = tempfile::tempdir().unwrap();
  let saved = GameInstance::with_iteration(5, Field::parse("...\n###\n...").unwrap(), 10);
  let path = JsonFileManager::new().save_batch(&[saved.clone(), saved], tmp.path()).unwrap();

  let mut m = manager(&tmp.path().join("elsewhere"), &[Command::None], &[]);
  m.start(StartMode::Load { path: Some(path) }).unwrap();

  let games = m.session().games();
  assert_eq!(games.iter().map(|g| g.id()).collect::<Vec<_>>(), vec![1, 2]);
  assert_eq!(games[0].iteration(), 11);
  assert_eq!(games[0].field().debug(), ".#.\n.#.\n.#.");
  assert_eq!(m.renderer().messages, vec!["Loaded game(s) successfully.", "Exiting game..."]);
}
