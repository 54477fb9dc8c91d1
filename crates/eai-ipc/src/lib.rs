//! Loopback IPC: endpoints paired by name within one process, with
//! synchronous delivery.
//!
//! Grounded on `lib/eai_ipc/src/loopback/ipc.c`: a fixed-size endpoint
//! table, name-based pairing performed at registration time, and `send`
//! invoking the peer's `received` callback directly on the caller's
//! thread rather than through a queue.

#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex, OnceLock};

/// Maximum simultaneously registered endpoints.
pub const MAX_ENDPOINTS: usize = 8;
/// Maximum bytes in one `name`, including a would-be null terminator —
/// carried over from the RPMsg-style wire contract even though this
/// backend stores names as owned `String`s.
pub const EPT_NAME_MAX: usize = 32;
/// Maximum payload bytes in one `send`, matching a typical RPMsg buffer.
pub const MAX_PACKET_SIZE: usize = 496;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpcError {
    InvalidParameter,
    NoMemory,
    NotPresent,
    NotConnected,
    MessageSize,
}

pub type IpcResult<T> = Result<T, IpcError>;

/// Handle to a registered endpoint. Identifies a slot in the module-wide
/// table; invalid once [`deregister`] has been called on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EndpointId(usize);

type BoundCb = Arc<dyn Fn() + Send + Sync>;
type ReceivedCb = Arc<dyn Fn(&[u8]) + Send + Sync>;

struct Slot {
    name: String,
    bound: BoundCb,
    received: ReceivedCb,
    peer: Option<usize>,
}

fn table() -> &'static Mutex<Vec<Option<Slot>>> {
    static TABLE: OnceLock<Mutex<Vec<Option<Slot>>>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new((0..MAX_ENDPOINTS).map(|_| None).collect()))
}

/// Reset the module to its just-initialized state, releasing every
/// endpoint without firing any callback.
pub fn init() {
    let mut guard = table().lock().unwrap_or_else(|e| e.into_inner());
    guard.iter_mut().for_each(|s| *s = None);
}

pub fn deinit() {
    init();
}

/// Register a new endpoint under `name`. If another registered,
/// not-yet-paired endpoint shares the name, the two become peers and
/// both `bound` callbacks fire before this call returns (order
/// unspecified).
pub fn register<B, R>(name: &str, bound: B, received: R) -> IpcResult<EndpointId>
where
    B: Fn() + Send + Sync + 'static,
    R: Fn(&[u8]) + Send + Sync + 'static,
{
    if name.is_empty() || name.len() >= EPT_NAME_MAX {
        return Err(IpcError::InvalidParameter);
    }

    let mut guard = table().lock().map_err(|_| IpcError::InvalidParameter)?;
    let index = guard
        .iter()
        .position(|s| s.is_none())
        .ok_or(IpcError::NoMemory)?;

    guard[index] = Some(Slot {
        name: name.to_string(),
        bound: Arc::new(bound),
        received: Arc::new(received),
        peer: None,
    });

    let peer_index = guard
        .iter()
        .enumerate()
        .find(|(i, s)| {
            *i != index
                && s.as_ref()
                    .map(|s| s.peer.is_none() && s.name == name)
                    .unwrap_or(false)
        })
        .map(|(i, _)| i);

    if let Some(peer_index) = peer_index {
        guard[index].as_mut().unwrap().peer = Some(peer_index);
        guard[peer_index].as_mut().unwrap().peer = Some(index);

        let peer_bound = guard[peer_index].as_ref().unwrap().bound.clone();
        let self_bound = guard[index].as_ref().unwrap().bound.clone();
        drop(guard);

        peer_bound();
        self_bound();
    }

    Ok(EndpointId(index))
}

/// Remove an endpoint. Its former peer is left registered but unbound;
/// a subsequent `send` on the peer returns `NotConnected`.
pub fn deregister(id: EndpointId) -> IpcResult<()> {
    let mut guard = table().lock().map_err(|_| IpcError::InvalidParameter)?;
    let slot = guard
        .get(id.0)
        .and_then(|s| s.as_ref())
        .ok_or(IpcError::NotPresent)?;
    if let Some(peer_index) = slot.peer {
        if let Some(Some(peer)) = guard.get_mut(peer_index) {
            peer.peer = None;
        }
    }
    guard[id.0] = None;
    Ok(())
}

/// Deliver `data` to the endpoint's peer, invoking the peer's `received`
/// callback synchronously on the calling thread.
pub fn send(id: EndpointId, data: &[u8]) -> IpcResult<()> {
    if data.is_empty() {
        return Err(IpcError::InvalidParameter);
    }
    if data.len() > MAX_PACKET_SIZE {
        return Err(IpcError::MessageSize);
    }

    let callback = {
        let guard = table().lock().map_err(|_| IpcError::InvalidParameter)?;
        let slot = guard
            .get(id.0)
            .and_then(|s| s.as_ref())
            .ok_or(IpcError::NotPresent)?;
        let peer_index = slot.peer.ok_or(IpcError::NotConnected)?;
        guard[peer_index].as_ref().unwrap().received.clone()
    };

    callback(data);
    Ok(())
}

pub fn max_packet_size() -> usize {
    MAX_PACKET_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    #[test]
    fn bidirectional_delivery_round_trip() {
        init();
        let bound_count = Arc::new(AtomicUsize::new(0));
        let received_by_b = Arc::new(StdMutex::new(Vec::new()));
        let received_by_a = Arc::new(StdMutex::new(Vec::new()));

        let bc1 = bound_count.clone();
        let rb = received_by_b.clone();
        let a = register(
            "data",
            move || {
                bc1.fetch_add(1, Ordering::SeqCst);
            },
            move |bytes| rb.lock().unwrap().extend_from_slice(bytes),
        )
        .unwrap();

        let bc2 = bound_count.clone();
        let ra = received_by_a.clone();
        let b = register(
            "data",
            move || {
                bc2.fetch_add(1, Ordering::SeqCst);
            },
            move |bytes| ra.lock().unwrap().extend_from_slice(bytes),
        )
        .unwrap();

        assert_eq!(bound_count.load(Ordering::SeqCst), 2);

        send(a, b"hello").unwrap();
        assert_eq!(&received_by_b.lock().unwrap()[..], b"hello");

        send(b, b"world").unwrap();
        assert_eq!(&received_by_a.lock().unwrap()[..], b"world");

        deregister(a).unwrap();
        assert_eq!(send(a, b"too late"), Err(IpcError::NotPresent));
        assert_eq!(send(b, b"orphaned"), Err(IpcError::NotConnected));
    }

    #[test]
    fn unpaired_endpoint_send_is_not_connected() {
        init();
        let ept = register("lonely", || {}, |_| {}).unwrap();
        assert_eq!(send(ept, b"x"), Err(IpcError::NotConnected));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        init();
        let a = register("big", || {}, |_| {}).unwrap();
        let _b = register("big", || {}, |_| {}).unwrap();
        let data = vec![0u8; MAX_PACKET_SIZE + 1];
        assert_eq!(send(a, &data), Err(IpcError::MessageSize));
    }

    #[test]
    fn table_full_registration_is_no_memory() {
        init();
        for i in 0..MAX_ENDPOINTS {
            register(&format!("ept-{i}"), || {}, |_| {}).unwrap();
        }
        assert_eq!(
            register("overflow", || {}, |_| {}).err(),
            Some(IpcError::NoMemory)
        );
    }

    #[test]
    fn empty_name_is_invalid_parameter() {
        init();
        assert_eq!(register("", || {}, |_| {}).err(), Some(IpcError::InvalidParameter));
    }
}
