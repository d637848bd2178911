//! Core types shared by devices and the server

mod ids;
mod progress;

pub use ids::{BookId, UserId};
pub use progress::{LocalCacheEntry, Percent, ProgressEntry, ProgressRecord};
