//! Playlist storage
//!
//! - `store` - circular track store
//! - `stack` - LIFO of store nodes for reverse walks
//! - `persist` - JSON save/load
//! - `slots` - fixed set of open playlists

pub mod persist;
pub mod slots;
pub mod stack;
pub mod store;
pub mod track;

pub use slots::PlaylistSlots;
pub use stack::TraversalStack;
pub use store::{NodeId, Playlist, SortKey};
pub use track::Track;
