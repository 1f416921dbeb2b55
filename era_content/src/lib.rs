//! # Era Content
//!
//! The content crate for the rabbit hole engine. It holds the already-loaded
//! representation of everything a player can be asked about: eras of
//! questions, the knowledge each choice is "about", and the crafting book of
//! technologies with their recipes and decoy herrings.
//!
//! This crate is pure data. It contains no engine logic and performs no I/O;
//! the loaders accept documents that were fetched elsewhere.
//!
//! ## Core Components
//!
//! - **knowledge**: Knowledge transmissions, coherence pairs and recipes
//! - **question**: Questions and their ordered choices
//! - **era**: Core questions plus follow-up topics for one historical era
//! - **crafting**: Technology nodes, herrings and the crafting core questions
//! - **loader**: Validating parsers from raw JSON documents

pub mod crafting;
pub mod era;
pub mod error;
pub mod knowledge;
pub mod loader;
pub mod question;

pub use crafting::*;
pub use era::*;
pub use error::*;
pub use knowledge::*;
pub use loader::*;
pub use question::*;
