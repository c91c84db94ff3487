//! Operator interface contract.
//!
//! An operator interface lets a person inspect and change configuration at
//! runtime over some command channel. The channel and its command syntax live
//! outside this crate; what it needs from a configuration is captured by
//! [`OperatorInterfaceClient`]. [`OperatorSession`] adds the idle-timeout
//! bookkeeping such an interface usually wants.

use std::time::{Duration, Instant};

/// Something an operator interface can address and modify byte by byte.
pub trait OperatorInterfaceClient {
    /// Returns `true` if `index` names an existing configuration byte.
    fn validate_address(&self, index: usize) -> bool;

    /// Applies an operator-supplied value.
    ///
    /// Returns `false` if the address is invalid or the value was rejected.
    fn process_value(&mut self, index: usize, value: u8) -> bool;

    /// Idle time after which an operator session should be considered expired.
    fn interaction_timeout(&self) -> Duration;
}

/// Result of submitting a value through an [`OperatorSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The value was accepted and committed.
    Applied,
    /// The address does not exist; the value was not considered.
    InvalidAddress,
    /// The client rejected the value.
    Rejected,
    /// The session had been idle too long; nothing was applied.
    Expired,
}

/// An interactive session against an operator-interface client.
///
/// The caller supplies the current instant on every interaction, which keeps
/// the session deterministic under test and free of hidden clock reads.
#[derive(Debug)]
pub struct OperatorSession<'a, C: OperatorInterfaceClient> {
    client: &'a mut C,
    timeout: Duration,
    last_activity: Instant,
}

impl<'a, C: OperatorInterfaceClient> OperatorSession<'a, C> {
    /// Opens a session at `now`, using the client's interaction timeout.
    pub fn open(client: &'a mut C, now: Instant) -> Self {
        let timeout = client.interaction_timeout();
        Self {
            client,
            timeout,
            last_activity: now,
        }
    }

    /// Returns `true` once the session has been idle longer than the timeout.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) > self.timeout
    }

    /// Records activity at `now` without submitting anything.
    ///
    /// Returns `false` if the session had already expired.
    pub fn touch(&mut self, now: Instant) -> bool {
        if self.is_expired(now) {
            return false;
        }
        self.last_activity = now;
        true
    }

    /// Validates `index`, then applies `value` to it.
    pub fn submit(&mut self, now: Instant, index: usize, value: u8) -> SubmitOutcome {
        if !self.touch(now) {
            return SubmitOutcome::Expired;
        }
        if !self.client.validate_address(index) {
            return SubmitOutcome::InvalidAddress;
        }
        if self.client.process_value(index, value) {
            SubmitOutcome::Applied
        } else {
            SubmitOutcome::Rejected
        }
    }

    /// Returns the client for read access between submissions.
    #[must_use]
    pub fn client(&self) -> &C {
        self.client
    }

    /// Returns the client mutably, e.g. to persist an applied value.
    pub fn client_mut(&mut self) -> &mut C {
        self.client
    }

    /// Ends the session and returns the client.
    pub fn close(self) -> &'a mut C {
        self.client
    }
}
