//! Scribble App Library
//!
//! Command line host for scribble sessions: replays recorded input against
//! a page's annotations, reports what is stored and exports it as PNG.

mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod script;

pub use app::{fit_strokes, run};
pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use script::{ScriptStep, load_script};
