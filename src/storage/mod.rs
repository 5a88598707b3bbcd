//! Persistence layer
//!
//! Only the small session-continuity subset survives a restart; the
//! switch state itself is in-memory by design.

mod file_system;

pub use file_system::{SessionStorage, StoredSession};
