pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `response()` was called on a conversation that never accumulated a
    /// fragment. Usually an async handler that was not awaited.
    #[error(
        "no response has been set; was a response added in an async call that was not awaited?"
    )]
    NoResponse,

    /// A fragment was added, or `response()` called again, after the
    /// conversation was finalized.
    #[error("response has already been digested")]
    AlreadyDigested,
}
