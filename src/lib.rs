pub mod config;
pub mod editor;
pub mod entry;
pub mod entry_store;
pub mod error;
pub mod logging;
pub mod preferences;
pub mod storage;
pub mod timer;

pub use error::{FreewriteError, Result};
