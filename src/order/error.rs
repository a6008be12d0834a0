use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderError {
    #[error("duplicate property source name: {0}")]
    DuplicateSourceName(String),
}
