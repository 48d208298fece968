pub mod details;
pub mod outcome;
pub mod search;
pub mod selection;
pub mod session;
pub mod signal;
pub mod store;
pub mod watched;

#[cfg(test)]
pub(crate) mod testing;

pub use details::{DetailsController, DetailsState, DETAILS_FAILED_MESSAGE};
pub use outcome::FetchOutcome;
pub use search::{SearchController, SearchState, SEARCH_FAILED_MESSAGE};
pub use selection::SelectionController;
pub use session::{Session, SessionError, SessionOptions};
pub use signal::ChangeSignal;
pub use store::{JsonStore, StoreError};
pub use watched::{WatchedCollection, WatchedError};
