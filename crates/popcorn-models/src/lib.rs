pub mod movie;
pub mod watched;

pub use movie::{MovieDetails, MovieSummary};
pub use watched::{WatchedEntry, WatchedStats};
