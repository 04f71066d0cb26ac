use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("a refresh is already in progress")]
    RefreshInFlight,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("commit limit {0} is outside 1..=100000000")]
    InvalidCommitLimit(u64),

    #[error("at most {max} key branches can be configured, got {got}")]
    TooManyKeyBranches { got: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
