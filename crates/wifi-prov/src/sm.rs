//! Provisioning state machine: a fixed transition table plus a
//! state-change callback that fires exactly once per successful move.

use std::sync::{Arc, Mutex};

use crate::types::{ProvError, ProvEvent, ProvResult, ProvState};

type StateCb = Arc<dyn Fn(ProvState, ProvState) + Send + Sync>;

fn next_state(from: ProvState, event: ProvEvent) -> Option<ProvState> {
    use ProvEvent::*;
    use ProvState::*;

    if event == FactoryReset {
        return Some(Idle);
    }

    match (from, event) {
        (Idle, ScanTrigger) => Some(Scanning),
        (Scanning, ScanDone) => Some(ScanComplete),
        (ScanComplete, CredentialsRx) => Some(Provisioning),
        (Idle, CredentialsRx) => Some(Provisioning),
        (Provisioning, WifiConnecting) => Some(Connecting),
        (Connecting, WifiConnected) => Some(Connected),
        (Connecting, WifiFailed) => Some(Idle),
        (Connected, WifiDisconnected) => Some(Idle),
        _ => None,
    }
}

pub struct StateMachine {
    state: Mutex<ProvState>,
    callback: Mutex<Option<StateCb>>,
}

impl StateMachine {
    /// Reset to `Idle` and install the state-change callback, replacing
    /// any previously registered one.
    pub fn new<F>(callback: Option<F>) -> Self
    where
        F: Fn(ProvState, ProvState) + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(ProvState::Idle),
            callback: Mutex::new(callback.map(|f| Arc::new(f) as StateCb)),
        }
    }

    pub fn state(&self) -> ProvState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `event`. On success, returns the new state and fires the
    /// callback on the calling thread before returning. An invalid
    /// (state, event) pair leaves the state unchanged, returns
    /// `NotPermitted`, and does not fire the callback.
    pub fn process_event(&self, event: ProvEvent) -> ProvResult<ProvState> {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let old = *guard;
        let new = next_state(old, event).ok_or(ProvError::NotPermitted)?;
        *guard = new;
        drop(guard);

        let cb = self.callback.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(cb) = cb {
            cb(old, new);
        }
        Ok(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn initial_state_is_idle() {
        let sm = StateMachine::new::<fn(ProvState, ProvState)>(None);
        assert_eq!(sm.state(), ProvState::Idle);
    }

    #[test]
    fn scan_flow_advances_through_scan_complete() {
        let sm = StateMachine::new::<fn(ProvState, ProvState)>(None);
        assert_eq!(
            sm.process_event(ProvEvent::ScanTrigger),
            Ok(ProvState::Scanning)
        );
        assert_eq!(
            sm.process_event(ProvEvent::ScanDone),
            Ok(ProvState::ScanComplete)
        );
    }

    #[test]
    fn happy_path_reaches_connected_with_five_callback_firings() {
        let count = Arc::new(AtomicU32::new(0));
        let count2 = count.clone();
        let sm = StateMachine::new(Some(move |_old: ProvState, _new: ProvState| {
            count2.fetch_add(1, Ordering::SeqCst);
        }));

        for event in [
            ProvEvent::ScanTrigger,
            ProvEvent::ScanDone,
            ProvEvent::CredentialsRx,
            ProvEvent::WifiConnecting,
            ProvEvent::WifiConnected,
        ] {
            sm.process_event(event).unwrap();
        }

        assert_eq!(sm.state(), ProvState::Connected);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn connection_failure_returns_to_idle() {
        let sm = StateMachine::new::<fn(ProvState, ProvState)>(None);
        sm.process_event(ProvEvent::ScanTrigger).unwrap();
        sm.process_event(ProvEvent::ScanDone).unwrap();
        sm.process_event(ProvEvent::CredentialsRx).unwrap();
        sm.process_event(ProvEvent::WifiConnecting).unwrap();
        assert_eq!(
            sm.process_event(ProvEvent::WifiFailed),
            Ok(ProvState::Idle)
        );
    }

    #[test]
    fn disconnect_from_connected_returns_to_idle() {
        let sm = StateMachine::new::<fn(ProvState, ProvState)>(None);
        for event in [
            ProvEvent::ScanTrigger,
            ProvEvent::ScanDone,
            ProvEvent::CredentialsRx,
            ProvEvent::WifiConnecting,
            ProvEvent::WifiConnected,
        ] {
            sm.process_event(event).unwrap();
        }
        assert_eq!(
            sm.process_event(ProvEvent::WifiDisconnected),
            Ok(ProvState::Idle)
        );
    }

    #[test]
    fn factory_reset_returns_to_idle_from_any_state() {
        let sm = StateMachine::new::<fn(ProvState, ProvState)>(None);
        sm.process_event(ProvEvent::ScanTrigger).unwrap();
        assert_eq!(sm.state(), ProvState::Scanning);
        assert_eq!(
            sm.process_event(ProvEvent::FactoryReset),
            Ok(ProvState::Idle)
        );
    }

    #[test]
    fn invalid_transition_is_rejected_and_state_unchanged() {
        let sm = StateMachine::new::<fn(ProvState, ProvState)>(None);
        assert_eq!(
            sm.process_event(ProvEvent::ScanDone),
            Err(ProvError::NotPermitted)
        );
        assert_eq!(sm.state(), ProvState::Idle);
    }

    #[test]
    fn credentials_rx_from_idle_skips_straight_to_provisioning() {
        let sm = StateMachine::new::<fn(ProvState, ProvState)>(None);
        assert_eq!(
            sm.process_event(ProvEvent::CredentialsRx),
            Ok(ProvState::Provisioning)
        );
    }
}
