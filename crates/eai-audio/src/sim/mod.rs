//! Simulation backend: an in-memory port table plus injection helpers for
//! tests, mirroring the fixed-size tables the original's native/posix
//! backend keeps as process-wide state.

use std::sync::Mutex;

use crate::types::{AudioError, AudioResult, Direction, Gain, Port, PortType, Route};

struct State {
    ports: Vec<Port>,
    routes: Vec<Route>,
}

fn default_ports() -> Vec<Port> {
    vec![
        Port {
            id: 0,
            name: "speaker".into(),
            direction: Direction::Output,
            port_type: PortType::Speaker,
            gain: Some(Gain {
                min_cb: -6000,
                max_cb: 600,
                step_cb: 50,
                current_cb: 0,
            }),
        },
        Port {
            id: 1,
            name: "mic".into(),
            direction: Direction::Input,
            port_type: PortType::Mic,
            gain: Some(Gain {
                min_cb: 0,
                max_cb: 4000,
                step_cb: 50,
                current_cb: 0,
            }),
        },
        Port {
            id: 2,
            name: "bt-sco".into(),
            direction: Direction::Output,
            port_type: PortType::BtSco,
            gain: None,
        },
    ]
}

fn state() -> &'static Mutex<State> {
    static STATE: std::sync::OnceLock<Mutex<State>> = std::sync::OnceLock::new();
    STATE.get_or_init(|| {
        Mutex::new(State {
            ports: default_ports(),
            routes: Vec::new(),
        })
    })
}

pub fn port_count() -> usize {
    state().lock().unwrap().ports.len()
}

pub fn port(index: u8) -> AudioResult<Port> {
    state()
        .lock()
        .unwrap()
        .ports
        .get(index as usize)
        .cloned()
        .ok_or(AudioError::InvalidParameter)
}

pub fn find_port(port_type: PortType, direction: Direction) -> AudioResult<Port> {
    state()
        .lock()
        .unwrap()
        .ports
        .iter()
        .find(|p| p.port_type == port_type && p.direction == direction)
        .cloned()
        .ok_or(AudioError::NotFound)
}

pub fn set_gain(port_id: u8, gain_cb: i32) -> AudioResult<()> {
    let mut guard = state().lock().unwrap();
    let port = guard
        .ports
        .get_mut(port_id as usize)
        .ok_or(AudioError::InvalidParameter)?;
    match &mut port.gain {
        Some(gain) => {
            gain.current_cb = gain.clamp(gain_cb);
            Ok(())
        }
        None => Err(AudioError::NotSupported),
    }
}

pub fn get_gain(port_id: u8) -> AudioResult<i32> {
    let guard = state().lock().unwrap();
    let port = guard.ports.get(port_id as usize).ok_or(AudioError::InvalidParameter)?;
    port.gain.map(|g| g.current_cb).ok_or(AudioError::NotSupported)
}

pub fn set_route(source_port_id: u8, sink_port_id: u8) -> AudioResult<()> {
    let mut guard = state().lock().unwrap();
    let source_ok = guard
        .ports
        .get(source_port_id as usize)
        .map(|p| p.direction == Direction::Input)
        .unwrap_or(false);
    let sink_ok = guard
        .ports
        .get(sink_port_id as usize)
        .map(|p| p.direction == Direction::Output)
        .unwrap_or(false);
    if !source_ok || !sink_ok {
        return Err(AudioError::InvalidParameter);
    }
    guard.routes.push(Route {
        source_port_id,
        sink_port_id,
        active: true,
    });
    Ok(())
}

pub fn route_count() -> usize {
    state().lock().unwrap().routes.len()
}

pub fn route(index: u8) -> AudioResult<Route> {
    state()
        .lock()
        .unwrap()
        .routes
        .get(index as usize)
        .copied()
        .ok_or(AudioError::InvalidParameter)
}

/// Reset the simulated port/route table to its defaults. Test-only.
pub fn test_reset() {
    let mut guard = state().lock().unwrap();
    guard.ports = default_ports();
    guard.routes.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_port_by_type_and_direction() {
        test_reset();
        let port = find_port(PortType::Speaker, Direction::Output).unwrap();
        assert_eq!(port.id, 0);
    }

    #[test]
    fn route_requires_direction_match() {
        test_reset();
        assert_eq!(set_route(0, 1), Err(AudioError::InvalidParameter));
        assert_eq!(set_route(1, 0), Ok(()));
        assert_eq!(route_count(), 1);
    }

    #[test]
    fn gain_clamped_to_port_range() {
        test_reset();
        set_gain(0, 10_000).unwrap();
        assert_eq!(get_gain(0).unwrap(), 600);
    }

    #[test]
    fn gain_on_port_without_gain_is_not_supported() {
        test_reset();
        assert_eq!(set_gain(2, 0), Err(AudioError::NotSupported));
    }
}
