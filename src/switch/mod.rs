//! Dead-man's-switch engine
//!
//! - Lock registry and validation
//! - Heartbeat tracking
//! - Inactivity watchdog
//! - Transfer executor
//! - Capped action log

pub mod action_log;
pub mod heartbeat;
pub mod registry;
pub mod transfer;
pub mod watchdog;

pub use action_log::{ActionLog, ActionLogEntry, Severity, LOG_CAPACITY};
pub use heartbeat::{HeartbeatState, MAX_INACTIVITY_MINUTES};
pub use registry::{is_valid_address, short_address, AssetStatus, LockRequest, LockedAsset};
pub use transfer::{TransferOutcome, TransferredAsset};
pub use watchdog::WatchdogVerdict;
