use thiserror::Error;

/// Top-level error type for the `baseline-api` crate.
///
/// Covers every failure mode of the external collaborators: HTTP transport,
/// weather API responses, payload decoding and host metric collection.
/// `baseline-core` renders these into snapshot error strings and
/// notifications, so the `Display` output is user-facing.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("HTTP error: request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Weather API ─────────────────────────────────────────────────
    /// Non-200 response carrying a `{"error":{"message":..}}` body.
    #[error("API error: {message} ({status})")]
    Api { status: u16, message: String },

    /// Non-200 response without a usable error body.
    #[error("API error: Status {status}")]
    Status { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("JSON parse error: {message}")]
    Deserialization { message: String, body: String },

    // ── Host metrics ────────────────────────────────────────────────
    /// The metrics provider could not produce a sample.
    #[error("System probe failed: {0}")]
    Probe(String),
}
