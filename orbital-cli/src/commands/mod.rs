//! CLI command implementations

mod cache;
mod list;
mod pull;
mod push;
mod read;
mod remove;
mod show;
mod stats;

pub use cache::cache;
pub use list::list;
pub use pull::pull;
pub use push::push;
pub use read::read;
pub use remove::remove;
pub use show::show;
pub use stats::stats;
