use thiserror::Error;

/// Retrieval errors raised by a [`ContentSource`](crate::content::ContentSource).
///
/// Any of these aborts the load that triggered it. The engine never retries
/// on its own; the previously resident theme (if any) is left in place and
/// the caller decides whether and when to try again.
///
/// # Error Categories
///
/// ## Transport Errors
/// - [`RequestFailed`] - The request could not be sent or the body not read
/// - [`Timeout`] - The request exceeded the configured timeout
///
/// ## Response Errors
/// - [`Status`] - The server answered with a non-success status
/// - [`InvalidResponse`] - The body could not be decoded as expected
///
/// # Examples
///
/// ```no_run
/// use engine::common::FetchError;
///
/// fn describe(error: &FetchError) -> &'static str {
///     match error {
///         FetchError::Timeout { .. } => "content root is slow, try again later",
///         FetchError::Status { status, .. } if *status == 404 => "theme not published",
///         _ => "content root unreachable",
///     }
/// }
/// ```
///
/// [`RequestFailed`]: FetchError::RequestFailed
/// [`Timeout`]: FetchError::Timeout
/// [`Status`]: FetchError::Status
/// [`InvalidResponse`]: FetchError::InvalidResponse
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be completed.
    ///
    /// Covers connection failures, TLS problems and interrupted bodies.
    #[error("Request failed: {url} - {reason}")]
    RequestFailed { url: String, reason: String },

    /// The server answered with a non-success HTTP status.
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The response body did not have the expected shape.
    ///
    /// For the descriptor this means the JSON did not match the theme schema.
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    /// The request took longer than the configured timeout.
    #[error("Request timeout after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },
}

/// Errors raised by a [`KeyValueStore`](crate::cache::KeyValueStore).
///
/// The cache gateway swallows these on reads (a broken store is a cache
/// miss) and logs them on writes. Only custom-color mutations surface them,
/// since the user asked for a change that could not be persisted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing entry failed.
    #[error("Store I/O failed for key '{key}': {reason}")]
    Io { key: String, reason: String },

    /// The store cannot be used at all (missing directory, bad permissions).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while walking color alias chains.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColorError {
    /// A `colorUsed` chain loops back onto an id it already visited.
    ///
    /// `chain` lists the ids in visiting order, ending with the repeated id.
    #[error("Cyclic color alias starting at '{id}': {}", chain.join(" -> "))]
    CyclicAlias { id: String, chain: Vec<String> },
}

/// Top-level error type of the theme engine.
///
/// Unknown references (a color, pixmap or element id that the theme does not
/// declare) are not errors: queries return `None` for them. The variants here
/// are the conditions a caller has to act on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThemeError {
    /// The descriptor or one of its textures could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A path in the descriptor lacks the marker segment it must contain.
    ///
    /// This points at a schema change on the content side, so it fails the
    /// load instead of being skipped.
    #[error("Malformed path '{path}': expected marker '{marker}'")]
    MalformedPath { path: String, marker: String },

    /// Color resolution hit a malformed alias chain.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// A custom-color change could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ThemeError {
    /// Returns `true` when retrying the same load may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ThemeError::Fetch(FetchError::RequestFailed { .. })
                | ThemeError::Fetch(FetchError::Timeout { .. })
                | ThemeError::Fetch(FetchError::Status {
                    status: 429 | 500..=599,
                    ..
                })
        )
    }
}
