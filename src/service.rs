//! Help-request lifecycle facade.
//!
//! [`HelpService`] ties the store and the match scheduler together: it is
//! the single object UI event handlers hold, constructor-injected with its
//! collaborators rather than reaching for process-wide state.

use std::sync::Arc;

use crate::error::Result;
use crate::matching::{MatchConfig, MatchScheduler, Notifier};
use crate::request::{HelpRequest, NewHelpRequest, RequestId, RequestStatus, UserId};
use crate::store::RequestStore;

/// Coordinates request storage and simulated helper matching.
///
/// Submitting a request schedules its delayed "helper found" notification;
/// moving a request to a terminal status cancels that notification if it
/// has not fired yet.
pub struct HelpService<S, N>
where
    S: RequestStore,
    N: Notifier,
{
    store: Arc<S>,
    scheduler: MatchScheduler<N>,
}

impl<S, N> HelpService<S, N>
where
    S: RequestStore,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: MatchConfig) -> Self {
        Self {
            store,
            scheduler: MatchScheduler::new(notifier, config),
        }
    }

    /// Submit a new help request and schedule its helper match.
    pub async fn submit(&self, input: NewHelpRequest) -> Result<HelpRequest> {
        let request = self.store.create(input).await?;
        self.scheduler.schedule(&request);
        Ok(request)
    }

    /// Get a single request by id.
    pub async fn request(&self, id: RequestId) -> Result<HelpRequest> {
        self.store.get(id).await
    }

    /// List a user's requests in insertion order.
    pub async fn requests_for(&self, user_id: &UserId) -> Result<Vec<HelpRequest>> {
        self.store.list_by_user(user_id).await
    }

    /// Update a request's status.
    ///
    /// Reaching a terminal status cancels the pending match notification,
    /// so a cancelled request never announces a found helper afterwards.
    pub async fn set_status(&self, id: RequestId, status: RequestStatus) -> Result<HelpRequest> {
        let updated = self.store.set_status(id, status).await?;
        if updated.status.is_terminal() && self.scheduler.cancel(id) {
            tracing::debug!(
                request_id = %id,
                status = %updated.status,
                "Cancelled pending helper match for terminal request"
            );
        }
        Ok(updated)
    }

    /// Cancel a request.
    pub async fn cancel(&self, id: RequestId) -> Result<HelpRequest> {
        self.set_status(id, RequestStatus::Cancelled).await
    }

    /// Mark a request accepted (a helper took it).
    pub async fn accept(&self, id: RequestId) -> Result<HelpRequest> {
        self.set_status(id, RequestStatus::Accepted).await
    }

    /// Mark a request completed.
    pub async fn complete(&self, id: RequestId) -> Result<HelpRequest> {
        self.set_status(id, RequestStatus::Completed).await
    }

    /// Number of match notifications still waiting to fire.
    pub fn pending_matches(&self) -> usize {
        self.scheduler.pending_count()
    }
}
