pub type PromoResult<T> = Result<T, PromoError>;

#[derive(thiserror::Error, Debug)]
pub enum PromoError {
    /// An input image could not be read or decoded. Job-fatal, never retried.
    #[error("decode error: {0}")]
    Decode(String),

    /// Bad job parameters: wrong output extension, unsupported image count.
    /// Validated before any frame work starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external video tool exited non-zero. Carries the captured stderr.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A pre-rendered overlay/clip asset or the watermark logo is absent.
    #[error("asset missing: {0}")]
    AssetMissing(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromoError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn asset_missing(msg: impl Into<String>) -> Self {
        Self::AssetMissing(msg.into())
    }
}
