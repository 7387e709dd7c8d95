//! Host load measurement reported alongside the operational state.
//!
//! # Data Flow
//! ```text
//! Report request
//!     → sampler.rs (snapshot, wait window, snapshot)
//!     → idle percentage for this request only
//! ```
//!
//! # Design Decisions
//! - Nothing is cached: every report measures afresh
//! - Sampling never touches the state lock

pub mod sampler;

pub use sampler::{IdleSampler, SystemIdleSampler};
