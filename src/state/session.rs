/// Scan session lifecycle and the single-flight dispatch guard
///
/// A `ScanSession` exists exactly while the user is scanning; it owns the
/// open camera stream, so dropping the session releases the device. The
/// capture tick subscription is derived from the session's existence:
/// no session, no ticks.
///
/// `DispatchState` lives on the application rather than the session so
/// that at most one classification request is outstanding even across a
/// stop/start of the session while a request is still in flight.
use crate::capture::camera::CameraFeed;
use crate::error::AppError;

/// Whether a classification request is currently outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    InFlight,
}

impl DispatchState {
    /// Attempt to claim the single dispatch slot.
    ///
    /// Returns true and transitions to `InFlight` when the slot was free.
    /// The read-check-then-set is atomic here because `update` invocations
    /// are serialized on the event loop; a multi-threaded host would need
    /// an atomic flag instead.
    pub fn try_begin(&mut self) -> bool {
        match self {
            DispatchState::Idle => {
                *self = DispatchState::InFlight;
                true
            }
            DispatchState::InFlight => false,
        }
    }

    /// Release the dispatch slot. Safe to call when already idle.
    pub fn finish(&mut self) {
        *self = DispatchState::Idle;
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, DispatchState::InFlight)
    }
}

/// What the capture loop should do with this tick's decode result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickAction {
    /// Nothing to send: no code found, empty payload, or a dispatch is
    /// already outstanding (the payload is dropped, not queued)
    Skip,
    /// Send this payload to the classification backend
    Dispatch(String),
}

/// Decide the tick outcome from a decode result and the dispatch guard.
///
/// Claims the dispatch slot as a side effect when it returns
/// `TickAction::Dispatch`; the caller must release it once the request
/// completes.
pub fn plan_tick(decoded: Option<String>, dispatch: &mut DispatchState) -> TickAction {
    match decoded {
        None => TickAction::Skip,
        // A decode always yields non-empty text; an empty payload is
        // tolerated as a no-op rather than sent.
        Some(payload) if payload.is_empty() => TickAction::Skip,
        Some(payload) => {
            if dispatch.try_begin() {
                TickAction::Dispatch(payload)
            } else {
                TickAction::Skip
            }
        }
    }
}

/// One scanning period: exclusive owner of the camera stream
pub struct ScanSession {
    pub feed: CameraFeed,
}

impl ScanSession {
    /// Acquire the configured camera and begin a session.
    ///
    /// Failure leaves no session behind; the error is reported inline.
    pub fn begin(camera_index: u32) -> Result<Self, AppError> {
        let feed = CameraFeed::open(camera_index)?;
        Ok(ScanSession { feed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight_guard() {
        let mut dispatch = DispatchState::default();
        assert!(!dispatch.is_in_flight());

        assert!(dispatch.try_begin());
        assert!(dispatch.is_in_flight());

        // Slot already claimed: later attempts must fail until finish()
        assert!(!dispatch.try_begin());
        assert!(!dispatch.try_begin());

        dispatch.finish();
        assert!(dispatch.try_begin());
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut dispatch = DispatchState::default();
        dispatch.finish();
        dispatch.finish();
        assert!(dispatch.try_begin());
    }

    #[test]
    fn test_no_decode_changes_nothing() {
        let mut dispatch = DispatchState::default();

        for _ in 0..10 {
            assert_eq!(plan_tick(None, &mut dispatch), TickAction::Skip);
        }
        assert!(!dispatch.is_in_flight());
    }

    #[test]
    fn test_empty_payload_is_a_noop() {
        let mut dispatch = DispatchState::default();

        assert_eq!(plan_tick(Some(String::new()), &mut dispatch), TickAction::Skip);
        assert!(!dispatch.is_in_flight());
    }

    #[test]
    fn test_decode_claims_the_slot() {
        let mut dispatch = DispatchState::default();

        let action = plan_tick(Some("https://example.com".to_string()), &mut dispatch);
        assert_eq!(action, TickAction::Dispatch("https://example.com".to_string()));
        assert!(dispatch.is_in_flight());
    }

    #[test]
    fn test_payloads_are_dropped_while_in_flight() {
        // Two decode results close together while the first request is
        // slow to resolve: only one dispatch may ever be issued.
        let mut dispatch = DispatchState::default();

        let first = plan_tick(Some("https://example.com".to_string()), &mut dispatch);
        assert!(matches!(first, TickAction::Dispatch(_)));

        let second = plan_tick(Some("https://example.com".to_string()), &mut dispatch);
        assert_eq!(second, TickAction::Skip);

        // The request resolves; the next decode may dispatch again.
        dispatch.finish();
        let third = plan_tick(Some("https://other.example".to_string()), &mut dispatch);
        assert!(matches!(third, TickAction::Dispatch(_)));
    }
}
