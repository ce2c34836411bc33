//! # Actors
//!
//! This module maintains the actor-lines tree: one directory per actor, each
//! holding that actor's line files.

pub mod errors;
pub mod propagate;
pub mod prune;
pub mod retention;
pub mod search;
pub mod start_tags;
pub mod tags;
pub mod tidy;
mod utils;

pub use prune::{ActorReport, PruneReport, Pruner};
pub use retention::Category;
pub use search::search;
pub use propagate::propagate;
pub use start_tags::{find_start_tags, remove_silent_tags};
pub use tags::audit;
pub use tidy::tidy;
