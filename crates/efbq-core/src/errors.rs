use std::path::PathBuf;

/// Core error type.
///
/// Adapter crates map their specific failures into this type so the forwarding
/// pipeline can report them consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Content sniffing failed.
///
/// Wrappers hand this back to the caller unmodified; there is no fallback
/// "unknown" MIME type.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no known content signature in {path}")]
    NoMatch { path: PathBuf },

    #[error("sniffer returned a non-utf8 mime type for {path}")]
    Encoding { path: PathBuf },

    #[error("file name is not valid utf-8: {path}")]
    NonUtf8Name { path: PathBuf },

    #[error("malformed mime type: {mime:?}")]
    MalformedMime { mime: String },
}
