//! Domain models for edgarsync.

pub mod event;
mod filing;
mod ticker;
mod worklist;

pub use event::{EventPayload, EventStats, EventStatus};
pub use filing::FilingFile;
pub use ticker::Ticker;
pub use worklist::{Order, WorklistEntry};
