//! Status transition rules for help requests.
//!
//! The lifecycle is monotonic:
//!
//! ```text
//! pending ──> accepted ──> completed
//!    │            │
//!    └────────────┴──────> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. A terminal request never moves
//! back to a non-terminal status. Re-setting the current status is an
//! idempotent no-op rather than an error, so callers can safely repeat a
//! cancel or complete. Transitions among non-terminal statuses are not
//! otherwise ordered: `accepted -> cancelled` is permitted, and so is a
//! direct `pending -> completed`.

use super::types::RequestStatus;

impl RequestStatus {
    /// Check whether a request currently in `self` may be set to `next`.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        // Same-status sets are always a no-op success; terminal statuses
        // accept nothing else.
        self == next || !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::RequestStatus::*;

    #[test]
    fn pending_can_move_anywhere() {
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
    }

    #[test]
    fn accepted_can_cancel_or_complete() {
        assert!(Accepted.can_transition_to(Completed));
        assert!(Accepted.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Pending));
    }

    #[test]
    fn terminal_statuses_are_frozen() {
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Accepted));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Accepted));
        assert!(!Cancelled.can_transition_to(Completed));
    }

    #[test]
    fn same_status_is_idempotent() {
        for status in [Pending, Accepted, Completed, Cancelled] {
            assert!(status.can_transition_to(status));
        }
    }
}
