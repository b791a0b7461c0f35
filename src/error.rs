use std::path::PathBuf;

/// error type for seedfs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid source url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid verification spec: {0}")]
    InvalidVerification(String),

    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("digest length mismatch for {algorithm}: expected {expected} bytes, got {actual}")]
    DigestLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("digest mismatch for {url}: expected {expected}, computed {actual}")]
    DigestMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("no such user: {0}")]
    NoSuchUser(String),

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    #[error("lookup failed for {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("can only append to regular files: {0}")]
    AppendTypeConflict(PathBuf),

    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    #[error("unsupported compression: {0}")]
    UnsupportedCompression(String),

    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),

    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
