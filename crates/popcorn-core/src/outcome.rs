use popcorn_sources::SourceError;
use tracing::warn;

/// Terminal result of a cancellable fetch. `Cancelled` is state-preserving:
/// a superseded request commits nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Ok(T),
    Cancelled,
    Failed(String),
}

/// Map a source failure to a displayable outcome. API-level misses keep
/// their message; transport and decoding problems collapse to the generic
/// text, with the technical detail kept in the log.
pub(crate) fn failure_outcome<T>(err: SourceError, generic_message: &str) -> FetchOutcome<T> {
    if err.is_not_found() {
        FetchOutcome::Failed(err.to_string())
    } else {
        warn!("Fetch failed: {}", err);
        FetchOutcome::Failed(generic_message.to_string())
    }
}
