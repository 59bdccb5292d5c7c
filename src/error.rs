use std::io;

use thiserror::Error;

/// Errors surfaced while generating a document or reading one back.
///
/// All variants are fatal: the generator either fully succeeds or
/// propagates the first failure to the caller. There are no retries
/// and no partial-output cleanup.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A layout operation was called before `add_page`.
    #[error("no page is open")]
    NoOpenPage,

    /// The requested font family is not one of the built-in fonts.
    #[error("unknown font family: {0}")]
    UnknownFont(String),

    #[error("not a PDF file")]
    NotAPdf,

    #[error("startxref not found")]
    StartxrefNotFound,

    #[error("malformed or missing xref table")]
    MalformedXref,

    #[error("malformed or missing trailer")]
    MalformedTrailer,

    #[error("malformed page tree")]
    MalformedPageTree,

    #[error("cannot resolve object {0}")]
    UnresolvableObject(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
