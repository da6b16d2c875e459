//! Simulated helper matching.
//!
//! After a request is submitted, a single delayed "helper found"
//! notification is scheduled for it. The scheduler keeps one cancellable
//! task per request id so that a request moving to a terminal status
//! before the delay elapses suppresses the notification. Matching is
//! purely a notification side effect and never mutates request status.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::request::{HelpRequest, HelpType, RequestId};

/// Delay the reference implementation uses before announcing a match.
pub const DEFAULT_MATCH_DELAY: Duration = Duration::from_millis(3000);

/// Configuration for the match scheduler.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// How long to wait after submission before the "helper found"
    /// notification fires.
    pub delay: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_MATCH_DELAY,
        }
    }
}

/// A "helper found" notification for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchNotification {
    pub request_id: RequestId,
    pub kind: HelpType,
    /// Human-readable message for UI display.
    pub message: String,
}

/// Per-kind message announced when a helper is found.
pub fn helper_found_message(kind: HelpType) -> &'static str {
    match kind {
        HelpType::Emergency => "Help is on the way. Stay on the line.",
        HelpType::Medical => "A registered nurse 1.2 miles away has accepted your request.",
        HelpType::Community => "A neighbor 0.8 miles away has accepted your request.",
    }
}

/// Sink for match notifications.
///
/// This seam keeps the scheduler independent of how notifications reach the
/// UI, and lets tests record them instead.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: MatchNotification);
}

/// Notifier that forwards notifications into a tokio channel.
///
/// The UI side holds the receiver. Send errors are ignored: a dropped
/// receiver just means nobody is listening anymore.
pub struct ChannelNotifier {
    tx: mpsc::Sender<MatchNotification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver for its notifications.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<MatchNotification>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, notification: MatchNotification) {
        let _ = self.tx.send(notification).await;
    }
}

/// Notifier that records every notification, for tests.
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: parking_lot::Mutex<Vec<MatchNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far.
    pub fn notifications(&self) -> Vec<MatchNotification> {
        self.notifications.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.notifications.lock().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: MatchNotification) {
        self.notifications.lock().push(notification);
    }
}

/// Schedules one delayed match notification per submitted request.
///
/// Each scheduled task races its delay against a per-request
/// [`CancellationToken`]; cancelling wins silently.
pub struct MatchScheduler<N: Notifier> {
    config: MatchConfig,
    notifier: Arc<N>,
    /// Map of request id -> (generation, cancellation token) for its
    /// pending match task. The generation lets a fired task remove only
    /// its own entry, never a replacement scheduled for the same id.
    tasks: Arc<DashMap<RequestId, (u64, CancellationToken)>>,
    next_generation: std::sync::atomic::AtomicU64,
}

impl<N: Notifier + 'static> MatchScheduler<N> {
    pub fn new(notifier: Arc<N>, config: MatchConfig) -> Self {
        Self {
            config,
            notifier,
            tasks: Arc::new(DashMap::new()),
            next_generation: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Schedule the delayed "helper found" notification for a request.
    ///
    /// Scheduling twice for the same id replaces the earlier task.
    pub fn schedule(&self, request: &HelpRequest) {
        let token = CancellationToken::new();
        let generation = self
            .next_generation
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if let Some((_, previous)) = self
            .tasks
            .insert(request.id, (generation, token.clone()))
        {
            previous.cancel();
        }

        let id = request.id;
        let kind = request.kind;
        let delay = self.config.delay;
        let notifier = self.notifier.clone();
        let tasks = self.tasks.clone();

        tracing::debug!(
            request_id = %id,
            kind = %kind,
            delay_ms = delay.as_millis() as u64,
            "Scheduled helper match"
        );

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    tasks.remove_if(&id, |_, (entry_generation, _)| {
                        *entry_generation == generation
                    });
                    tracing::info!(request_id = %id, kind = %kind, "Helper found");
                    notifier
                        .notify(MatchNotification {
                            request_id: id,
                            kind,
                            message: helper_found_message(kind).to_string(),
                        })
                        .await;
                }
                _ = token.cancelled() => {
                    tracing::debug!(request_id = %id, "Helper match cancelled before firing");
                }
            }
        });
    }

    /// Cancel the pending match task for a request, if one exists.
    ///
    /// Returns true if a task was still pending.
    pub fn cancel(&self, id: RequestId) -> bool {
        if let Some((_, (_, token))) = self.tasks.remove(&id) {
            token.cancel();
            true
        } else {
            false
        }
    }

    /// Number of match tasks still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{NewHelpRequest, RequestStatus};
    use std::collections::HashMap;

    fn pending_request(kind: HelpType) -> HelpRequest {
        let input = NewHelpRequest::new("u1", kind);
        let now = chrono::Utc::now();
        HelpRequest {
            id: RequestId::new(),
            user_id: input.user_id,
            kind: input.kind,
            status: RequestStatus::Pending,
            description: None,
            location: None,
            created_at: now,
            updated_at: now,
            help_details: HashMap::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn notification_fires_after_delay() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = MatchScheduler::new(
            notifier.clone(),
            MatchConfig {
                delay: Duration::from_millis(20),
            },
        );

        let request = pending_request(HelpType::Medical);
        scheduler.schedule(&request);
        assert_eq!(scheduler.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].request_id, request.id);
        assert_eq!(
            notifications[0].message,
            "A registered nurse 1.2 miles away has accepted your request."
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_notifies() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = MatchScheduler::new(
            notifier.clone(),
            MatchConfig {
                delay: Duration::from_millis(30),
            },
        );

        let request = pending_request(HelpType::Community);
        scheduler.schedule(&request);
        assert!(scheduler.cancel(request.id));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(notifier.count(), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn cancel_without_pending_task_reports_false() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = MatchScheduler::new(notifier, MatchConfig::default());
        assert!(!scheduler.cancel(RequestId::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_the_earlier_task() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = MatchScheduler::new(
            notifier.clone(),
            MatchConfig {
                delay: Duration::from_millis(20),
            },
        );

        let request = pending_request(HelpType::Emergency);
        scheduler.schedule(&request);
        scheduler.schedule(&request);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fired_task_does_not_unregister_a_replacement_for_the_same_id() {
        let notifier = Arc::new(RecordingNotifier::new());
        let scheduler = MatchScheduler::new(
            notifier.clone(),
            MatchConfig {
                delay: Duration::from_millis(20),
            },
        );

        let request = pending_request(HelpType::Medical);
        scheduler.schedule(&request);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(notifier.count(), 1);
        assert_eq!(scheduler.pending_count(), 0);

        // Reuse the id after the first task fired; only the entry belonging
        // to the fired task may be removed, so the replacement must still be
        // registered and cancellable.
        scheduler.schedule(&request);
        assert_eq!(scheduler.pending_count(), 1);
        assert!(scheduler.cancel(request.id));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn channel_notifier_delivers_to_receiver() {
        let (notifier, mut rx) = ChannelNotifier::new(8);
        let scheduler = MatchScheduler::new(
            Arc::new(notifier),
            MatchConfig {
                delay: Duration::from_millis(10),
            },
        );

        let request = pending_request(HelpType::Emergency);
        scheduler.schedule(&request);

        let notification = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for notification")
            .expect("channel closed");
        assert_eq!(notification.kind, HelpType::Emergency);
        assert_eq!(notification.message, "Help is on the way. Stay on the line.");
    }
}
