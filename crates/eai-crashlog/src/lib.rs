//! Crash-dump capture: query/clear/emit against a coredump store,
//! framed as `#CD:` hex lines for RTT/log capture.

#![forbid(unsafe_code)]

mod crashlog;
mod format;
mod store;
mod types;

pub use crashlog::CrashLog;
pub use format::{BEGIN_MARKER, COPY_BUF_SZ, END_MARKER, HEX_LINE_SZ};
pub use store::{CoredumpStore, MemoryCoredumpStore};
pub use types::{CrashError, CrashResult};
