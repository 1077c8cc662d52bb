pub mod config;
pub mod errors;
pub mod format;
pub mod notification;

pub use errors::{TallyError, TallyResult};
