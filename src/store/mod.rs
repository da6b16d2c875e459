//! Storage for help requests.
//!
//! This module defines the [`RequestStore`] trait, the interface for
//! creating requests, listing them per user, and driving status updates.
//! The store owns every [`HelpRequest`] it holds; all methods hand back
//! clones, never references into the store.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::{HelpRequest, NewHelpRequest, RequestId, RequestStatus, UserId};

mod memory;

pub use memory::MemoryRequestStore;

/// Storage trait for persisting and querying help requests.
///
/// Implementations are responsible for enforcing the lifecycle rules on
/// `set_status` via [`RequestStatus::can_transition_to`].
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Create a new request in the `pending` status.
    ///
    /// Assigns a fresh id and stamps `created_at` and `updated_at` with the
    /// same instant.
    ///
    /// # Errors
    /// Returns `Validation` if the owning user id is empty.
    async fn create(&self, input: NewHelpRequest) -> Result<HelpRequest>;

    /// Get a request by id.
    ///
    /// # Errors
    /// Returns `RequestNotFound` if the id is unknown.
    async fn get(&self, id: RequestId) -> Result<HelpRequest>;

    /// List all requests owned by a user, in insertion order.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<HelpRequest>>;

    /// Set a request's status, refreshing `updated_at`.
    ///
    /// Setting the current status again is an idempotent no-op success (the
    /// timestamp is still refreshed).
    ///
    /// # Errors
    /// Returns `RequestNotFound` if the id is unknown, or
    /// `InvalidTransition` if the request is in a terminal status and
    /// `status` differs from it.
    async fn set_status(&self, id: RequestId, status: RequestStatus) -> Result<HelpRequest>;
}
