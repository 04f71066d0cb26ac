//! Data acquisition and application state for the keygraph viewer.
//!
//! The [`Controller`] runs the three feeds through a [`CommandRunner`],
//! rebuilds the graph model wholesale and re-runs the layout.

pub mod config;
pub mod controller;
pub mod error;
pub mod feeds;
pub mod runner;
pub mod state;

pub use config::{Config, CONFIG_FILE};
pub use controller::{Controller, RefreshReport};
pub use error::{CoreError, Result};
pub use feeds::{Feed, FetchFailure};
pub use runner::{CommandOutput, CommandRunner, ShellRunner};
pub use state::{AppState, Snapshot, Status};
