//! Shared HTTP error mapping for all providers

use sibyl_core::SibylError;

/// Map a transport failure to the pipeline error taxonomy.
///
/// Deadline overruns become `BackendTimeout` so callers can suggest a
/// larger `timeout_secs`; everything else is `BackendUnavailable`.
pub(crate) fn transport_error(err: reqwest::Error, timeout_secs: u64) -> SibylError {
    if err.is_timeout() {
        SibylError::BackendTimeout { timeout_secs }
    } else {
        SibylError::BackendUnavailable(err.to_string())
    }
}

/// Map a non-2xx status plus body to `BackendUnavailable`
pub(crate) fn status_error(provider: &str, status: reqwest::StatusCode, body: String) -> SibylError {
    SibylError::BackendUnavailable(format!("{provider} API error ({status}): {body}"))
}

/// Map an embedding transport failure to `Embedding`.
///
/// `BackendTimeout` and `BackendUnavailable` name the generation
/// backend; a failing embedder is a different outage and keeps its own
/// variant, with the deadline noted in the message when it was the cause.
pub(crate) fn embed_transport_error(err: reqwest::Error, timeout_secs: u64) -> SibylError {
    if err.is_timeout() {
        SibylError::Embedding(format!(
            "embedding request timed out after {timeout_secs}s"
        ))
    } else {
        SibylError::Embedding(err.to_string())
    }
}
