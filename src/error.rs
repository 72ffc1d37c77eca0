use thiserror::Error;

/// Failures that abort a whole selection call.
///
/// Per-instance anomalies (a matched server without the requested
/// address kind) do not show up here; they are aggregated on the
/// [`Selection`](crate::Selection) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed tag pair `{0}`, expected `key:value`")]
    MalformedTagPair(String),

    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),

    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("provider request failed: {0}")]
    Network(String),

    #[error("no compute endpoint for region `{0}` in the service catalog")]
    UnknownRegion(String),
}
