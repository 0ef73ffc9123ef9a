pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod gc;
pub mod host;
pub mod inspect;
pub mod io;
pub mod ledger;
pub mod log;
pub mod mail;
pub mod record;
pub mod replay;
pub mod shell;
pub mod tags;

pub use context::Context;
pub use error::{LazysyncError, Result};
