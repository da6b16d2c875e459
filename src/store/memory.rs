//! In-memory request store.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{HelplineError, Result};
use crate::request::{HelpRequest, NewHelpRequest, RequestId, RequestStatus, UserId};

use super::RequestStore;

/// In-memory [`RequestStore`] backed by a mutex-guarded vector.
///
/// Access is UI-event-driven and effectively serial, so a plain mutex is
/// enough; the vector keeps insertion order for `list_by_user`. Nothing
/// survives a process restart.
#[derive(Default)]
pub struct MemoryRequestStore {
    requests: Mutex<Vec<HelpRequest>>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests currently held, across all users.
    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}

#[async_trait]
impl RequestStore for MemoryRequestStore {
    async fn create(&self, input: NewHelpRequest) -> Result<HelpRequest> {
        if input.user_id.0.trim().is_empty() {
            return Err(HelplineError::Validation(
                "user id is required to create a help request".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let request = HelpRequest {
            id: RequestId::new(),
            user_id: input.user_id,
            kind: input.kind,
            status: RequestStatus::Pending,
            description: input.description,
            location: input.location,
            created_at: now,
            updated_at: now,
            help_details: input.help_details,
        };

        tracing::info!(
            request_id = %request.id,
            user_id = %request.user_id,
            kind = %request.kind,
            "Created help request"
        );

        self.requests.lock().push(request.clone());
        Ok(request)
    }

    async fn get(&self, id: RequestId) -> Result<HelpRequest> {
        self.requests
            .lock()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(HelplineError::RequestNotFound(id))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<HelpRequest>> {
        Ok(self
            .requests
            .lock()
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: RequestId, status: RequestStatus) -> Result<HelpRequest> {
        let mut requests = self.requests.lock();
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(HelplineError::RequestNotFound(id))?;

        if !request.status.can_transition_to(status) {
            tracing::warn!(
                request_id = %id,
                from = %request.status,
                to = %status,
                "Rejected status transition"
            );
            return Err(HelplineError::InvalidTransition(id, request.status, status));
        }

        tracing::info!(
            request_id = %id,
            from = %request.status,
            to = %status,
            "Updated help request status"
        );

        request.status = status;
        request.updated_at = chrono::Utc::now();
        Ok(request.clone())
    }
}
