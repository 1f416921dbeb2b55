//! # Rabbit Hole
//!
//! A branching decision engine. A player answers a question, the answer is
//! scored, and a good enough answer opens a deeper layer of follow-up
//! questions (a "rabbit hole"). The deeper the hole, the better the answers
//! have to be.
//!
//! ## Architecture
//!
//! - **Config**: session tunables, loadable from TOML or JSON
//! - **Coherence / Threshold**: how a choice is scored and how good it must be
//! - **Session**: the answer log, depth and crafting queue of one playthrough
//! - **Engine**: the generic traversal, with a question variant and a
//!   crafting variant plugged in through [`ContentGraph`] and
//!   [`ScoringStrategy`]
//! - **Observer**: structured logging hooks
//!
//! Content comes from the `era_content` crate.

pub mod coherence;
pub mod config;
pub mod engine;
pub mod error;
pub mod observer;
pub mod session;
pub mod threshold;

pub use coherence::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use observer::*;
pub use session::*;
pub use threshold::*;
