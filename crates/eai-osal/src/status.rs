/// Outcome of an OSAL operation.
///
/// Every OSAL primitive returns one of these five kinds — no panics, no
/// exceptions, for user-triggered inputs. `Error` is the catch-all for
/// backend failures that don't map to a more specific kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OsalStatus {
    Ok,
    InvalidParameter,
    Timeout,
    NoMemory,
    Error,
}

/// Milliseconds, as carried by every timeout parameter in this crate.
pub type TimeoutMs = u32;

/// Sentinel meaning "return immediately if the operation would block".
pub const NO_WAIT: TimeoutMs = 0;

/// Sentinel meaning "block until the operation can complete".
pub const WAIT_FOREVER: TimeoutMs = TimeoutMs::MAX;
