use std::path::{Path, PathBuf};
use std::thread;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use crate::command::{Command, CommandRouter, CommandTarget, Console, Flow, RouteContext};
use crate::config::Config;
use crate::error::{GameError, Result};
use crate::field::Field;
use crate::instance::GameInstance;
use crate::store::{FileManager, SaveFile, SaveKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartMode {
  /// `games` fresh random square fields of side `field_size`.
  New { games: usize, field_size: usize },
  /// Without a path the [`SaveSelector`] picks one of the existing saves.
  Load { path: Option<PathBuf> },
  /// Many small games, shown one at a time.
  ShowcaseAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Setup,
  Running,
  Terminated,
}

pub trait Renderer: Console {
  fn render(&mut self, frame: &Frame<'_>);
}

pub trait InputHandler {
  /// Next pending command, `Command::None` when there is nothing to do.
  fn command(&mut self) -> Command;
}

pub trait SaveSelector {
  fn select(&mut self, saves: &[SaveFile]) -> Option<PathBuf>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceView<'a> {
  pub id: u32,
  pub field: &'a Field,
  pub iteration: u64,
  pub living_cells: usize,
  pub paused: bool,
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
  pub games: Vec<InstanceView<'a>>,
  /// Covers every game, visible or not.
  pub active_games: usize,
  pub total_living_cells: usize,
  pub single_view: bool,
}

/// The games of one run plus display bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Session {
  games: Vec<GameInstance>,
  /// `Some(i)` with `i < games.len()`, or `None` when there are no games.
  focused: Option<usize>,
  single_view: bool,
}

impl Session {
  pub fn new(games: Vec<GameInstance>, single_view: bool) -> Self {
    let focused = if games.is_empty() { None } else { Some(0) };
    Self { games, focused, single_view }
  }

  pub fn games(&self) -> &[GameInstance] {
    &self.games
  }

  pub fn len(&self) -> usize {
    self.games.len()
  }

  pub fn is_empty(&self) -> bool {
    self.games.is_empty()
  }

  pub fn focused(&self) -> Option<usize> {
    self.focused
  }

  pub fn single_view(&self) -> bool {
    self.single_view
  }

  /// Returns `false` and keeps the current focus when `index` is out of range.
  pub fn focus(&mut self, index: usize) -> bool {
    if index >= self.games.len() {
      return false;
    }
    self.focused = Some(index);
    true
  }

  pub fn toggle_pause(&mut self, index: usize) -> bool {
    match self.games.get_mut(index) {
      Some(game) => {
        game.toggle_paused();
        true
      }
      None => false,
    }
  }

  pub fn toggle_pause_all(&mut self) {
    for game in &mut self.games {
      game.toggle_paused();
    }
  }

  /// Advances every running game once and returns how many moved.
  ///
  /// Games are independent, so they are stepped in parallel; all of them have
  /// finished when this returns.
  pub fn advance_all(&mut self) -> usize {
    self.games
      .par_iter_mut()
      .map(|game| game.advance() as usize)
      .sum()
  }

  pub fn active_games(&self) -> usize {
    self.games.iter().filter(|game| !game.is_paused()).count()
  }

  pub fn total_living_cells(&self) -> usize {
    self.games.iter().map(GameInstance::living_cells).sum()
  }

  pub fn frame(&self) -> Frame<'_> {
    let visible: Box<dyn Iterator<Item = &GameInstance>> = if self.single_view {
      Box::new(self.focused.and_then(|i| self.games.get(i)).into_iter())
    } else {
      Box::new(self.games.iter())
    };

    Frame {
      games: visible.map(|game| InstanceView {
        id: game.id(),
        field: game.field(),
        iteration: game.iteration(),
        living_cells: game.living_cells(),
        paused: game.is_paused(),
      }).collect(),
      active_games: self.active_games(),
      total_living_cells: self.total_living_cells(),
      single_view: self.single_view,
    }
  }
}

/// Command callbacks bound to a session and its save directory.
struct SessionTarget<'a, F> {
  session: &'a mut Session,
  files: &'a F,
  save_dir: &'a Path,
}

impl<F: FileManager> CommandTarget for SessionTarget<'_, F> {
  fn save_all(&mut self) -> Result<()> {
    self.files.save_batch(self.session.games(), self.save_dir)?;
    Ok(())
  }

  fn save_one(&mut self, index: usize) -> Result<()> {
    let game = self.session.games()
      .get(index)
      .ok_or_else(|| GameError::UserInput(format!("no game {}", index + 1)))?;
    self.files.save_one(game, self.save_dir)?;
    Ok(())
  }

  fn toggle_pause_all(&mut self) {
    self.session.toggle_pause_all();
  }

  fn toggle_pause_one(&mut self, index: usize) {
    self.session.toggle_pause(index);
  }

  fn select(&mut self, index: usize) {
    self.session.focus(index);
  }
}

fn rng_for(seed: Option<u64>, id: u32) -> StdRng {
  match seed {
    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
    None => StdRng::from_entropy(),
  }
}

fn game_ids(count: usize) -> Result<u32> {
  u32::try_from(count).map_err(|_| GameError::validation(format!("too many games: {}", count)))
}

/// Runs one session: setup, then the command/render/advance loop.
pub struct MultiGameManager<R, I, S, F> {
  config: Config,
  renderer: R,
  input: I,
  selector: S,
  files: F,
  router: CommandRouter,
  session: Session,
  phase: Phase,
}

impl<R, I, S, F> MultiGameManager<R, I, S, F>
where
  R: Renderer,
  I: InputHandler,
  S: SaveSelector,
  F: FileManager,
{
  pub fn new(config: Config, renderer: R, input: I, selector: S, files: F) -> Self {
    Self {
      config,
      renderer,
      input,
      selector,
      files,
      router: CommandRouter::new(),
      session: Session::default(),
      phase: Phase::Setup,
    }
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn renderer(&self) -> &R {
    &self.renderer
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Sets up and runs until the user quits.
  pub fn start(&mut self, mode: StartMode) -> Result<()> {
    self.setup(mode)?;
    self.run();
    Ok(())
  }

  /// Builds the session for `mode`.
  ///
  /// On failure the manager is terminated, the reason has been shown through
  /// the renderer, and no game exists.
  pub fn setup(&mut self, mode: StartMode) -> Result<()> {
    if self.phase != Phase::Setup {
      return Err(GameError::validation("session is already set up"));
    }

    let result = match mode {
      StartMode::New { games, field_size } => self.new_games(games, field_size),
      StartMode::Load { path } => self.load_games(path),
      StartMode::ShowcaseAll => self.showcase(),
    };

    match result {
      Ok(session) => {
        info!(games = session.len(), single_view = session.single_view(), "session ready");
        self.session = session;
        self.phase = Phase::Running;
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "setup failed");
        self.renderer.message(&e.to_string());
        self.phase = Phase::Terminated;
        Err(e)
      }
    }
  }

  fn new_games(&self, games: usize, field_size: usize) -> Result<Session> {
    let (min, max) = (self.config.min_games, self.config.max_games);
    if games < min || games > max {
      return Err(GameError::validation(format!(
        "number of games must be between {} and {}, got {}", min, max, games)));
    }
    if field_size == 0 {
      return Err(GameError::validation("field size must be positive"));
    }

    let seed = self.config.seed;
    let games = (1..=game_ids(games)?)
      .map(|id| GameInstance::new(id, Field::random(field_size, field_size, &mut rng_for(seed, id))))
      .collect();
    Ok(Session::new(games, false))
  }

  fn showcase(&self) -> Result<Session> {
    let count = game_ids(self.config.showcase_games)?;
    let size = self.config.showcase_field_size;
    if count == 0 || size == 0 {
      return Err(GameError::validation("showcase needs at least one game of size 1"));
    }

    let seed = self.config.seed;
    let games: Vec<_> = (1..=count)
      .into_par_iter()
      .map(|id| GameInstance::new(id, Field::random(size, size, &mut rng_for(seed, id))))
      .collect();
    debug!(games = games.len(), size, "built showcase");
    Ok(Session::new(games, true))
  }

  fn load_games(&mut self, path: Option<PathBuf>) -> Result<Session> {
    let path = match path {
      Some(path) => path,
      None => {
        let saves = self.files.list_saves(&self.config.save_dir)?;
        if saves.is_empty() {
          return Err(GameError::Setup("No save games exist.".to_owned()));
        }
        self.selector
          .select(&saves)
          .ok_or_else(|| GameError::Setup("No valid file selected.".to_owned()))?
      }
    };

    let games = match SaveKind::of(&path) {
      SaveKind::Batch => self.files.load_batch(&path)?.into_instances()?,
      SaveKind::Single => vec![self.files.load_one(&path)?.into_instance(1)?],
    };
    self.renderer.message("Loaded game(s) successfully.");
    Ok(Session::new(games, false))
  }

  /// One loop step: route a command, render, advance.
  ///
  /// Commands are only read here, so every game has completed the previous
  /// generation before the next command is handled.
  pub fn tick(&mut self) -> Phase {
    if self.phase != Phase::Running {
      return self.phase;
    }

    let command = self.input.command();
    let ctx = RouteContext {
      games: self.session.len(),
      single_view: self.session.single_view(),
    };
    let mut target = SessionTarget {
      session: &mut self.session,
      files: &self.files,
      save_dir: &self.config.save_dir,
    };
    if self.router.process(command, ctx, &mut target, &mut self.renderer) == Flow::Stop {
      info!("session terminated");
      self.phase = Phase::Terminated;
      return self.phase;
    }

    self.renderer.render(&self.session.frame());
    let advanced = self.session.advance_all();
    debug!(advanced, "tick complete");
    self.phase
  }

  pub fn run(&mut self) {
    let delay = self.config.frame_delay();
    while self.tick() == Phase::Running {
      if !delay.is_zero() {
        thread::sleep(delay);
      }
    }
  }
}
