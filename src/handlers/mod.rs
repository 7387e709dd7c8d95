//! Per-connection protocol handlers.
//!
//! # Data Flow
//! ```text
//! Report channel:
//!     accept → report.rs → sample idle → read state → write line → close
//!
//! Control channel:
//!     accept → control.rs → read one line → StateStore::set → write result → close
//! ```
//!
//! # Design Decisions
//! - Handlers are generic over the stream, so tests drive them in memory
//! - The store arrives as `&dyn StateStore`; handlers never own global state
//! - I/O errors are returned to the caller, which drops the connection

pub mod control;
pub mod report;

pub use control::{handle_control, ControlOutcome};
pub use report::{format_report, handle_report};
