//! Shared crash-log types.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrashError {
    /// No coredump is stored.
    NotFound,
    /// The store reports a dump but its size query came back empty.
    NoData,
    /// The store's copy command failed partway through a read.
    Io,
    Error,
}

pub type CrashResult<T> = Result<T, CrashError>;
