//! Several independent Game of Life boards run side by side, with saving,
//! loading and pausing driven from a front end through small traits.

pub mod command;
pub mod config;
pub mod error;
pub mod field;
pub mod instance;
pub mod manager;
pub mod rule;
pub mod snapshot;
pub mod store;

pub use command::{Command, CommandRouter, CommandTarget, Console};
pub use config::Config;
pub use error::{GameError, Result};
pub use field::Field;
pub use instance::GameInstance;
pub use manager::{Frame, InputHandler, MultiGameManager, Phase, Renderer, SaveSelector, Session, StartMode};
pub use rule::{Rule, GAME_OF_LIFE};
pub use snapshot::{SnapshotBatch, SnapshotRecord};
pub use store::{FileManager, JsonFileManager, SaveFile, SaveKind};
