//! Help-request lifecycle library for a parent-support platform.
//!
//! This crate provides the in-process core behind the UI: a store of help
//! requests with a monotonic status lifecycle, a scheduler that simulates
//! helper matching with a cancellable delayed notification, and trait seams
//! for the external collaborators (assistant text generation, auth,
//! geolocation). There is no backend; everything lives in memory and is
//! owned by explicitly constructed objects.

pub mod assistant;
pub mod auth;
pub mod error;
pub mod location;
pub mod matching;
pub mod request;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use assistant::{AssistantClient, Conversation, GeminiClient, MockAssistant, ScriptedAssistant};
pub use error::{HelplineError, Result};
pub use matching::{
    ChannelNotifier, MatchConfig, MatchNotification, MatchScheduler, Notifier, RecordingNotifier,
};
pub use request::{HelpRequest, HelpType, Location, NewHelpRequest, RequestId, RequestStatus, UserId};
pub use service::HelpService;
pub use store::{MemoryRequestStore, RequestStore};
