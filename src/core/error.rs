use std::io;

#[derive(thiserror::Error, Debug)]
pub enum LensError {
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http error: {0}")]
    Http(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("unknown error")]
    Unknown,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for LensError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LensError::Timeout
        } else if err.is_connect() {
            LensError::Network(err.to_string())
        } else if err.is_status() {
            LensError::Http(err.to_string())
        } else {
            LensError::Unknown
        }
    }
}
