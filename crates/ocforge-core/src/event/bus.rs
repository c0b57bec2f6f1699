//! Workbench event channel.
//!
//! The workbench owns the sending half; views hold a [`WorkbenchEvents`]
//! subscription and render progress from it. A subscriber that falls behind
//! skips the events it missed instead of failing.

use ocforge_types::event::WorkbenchEvent;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Events a single workbench action can emit, with headroom.
pub const DEFAULT_CAPACITY: usize = 64;

/// Sending half, owned by one workbench.
pub struct EventBus {
    sender: broadcast::Sender<WorkbenchEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> WorkbenchEvents {
        WorkbenchEvents {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish to every live subscription. Returns how many received it.
    pub fn publish(&self, event: WorkbenchEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A subscription to one workbench's events.
pub struct WorkbenchEvents {
    receiver: broadcast::Receiver<WorkbenchEvent>,
}

impl WorkbenchEvents {
    /// Wait for the next event. `None` once the workbench is gone.
    pub async fn next(&mut self) -> Option<WorkbenchEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "workbench subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The next event if one is already queued.
    pub fn try_next(&mut self) -> Option<WorkbenchEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "workbench subscriber lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<WorkbenchEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocforge_types::event::{GenerationKind, SaveStatus};

    fn started(kind: GenerationKind) -> WorkbenchEvent {
        WorkbenchEvent::GenerationStarted { kind }
    }

    #[tokio::test]
    async fn subscribers_each_receive_published_events() {
        let bus = EventBus::new(16);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(started(GenerationKind::Avatar)), 2);

        assert_eq!(first.next().await, Some(started(GenerationKind::Avatar)));
        assert_eq!(second.try_next(), Some(started(GenerationKind::Avatar)));
    }

    #[test]
    fn publish_without_subscribers_reaches_nobody() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(started(GenerationKind::Persona)), 0);
    }

    #[test]
    fn lagging_subscriber_skips_to_oldest_retained() {
        let bus = EventBus::new(2);
        let mut events = bus.subscribe();
        bus.publish(started(GenerationKind::Persona));
        bus.publish(started(GenerationKind::Avatar));
        bus.publish(WorkbenchEvent::StatusChanged {
            from: SaveStatus::New,
            to: SaveStatus::Saving,
        });

        let drained = events.drain();
        assert_eq!(
            drained,
            vec![
                started(GenerationKind::Avatar),
                WorkbenchEvent::StatusChanged {
                    from: SaveStatus::New,
                    to: SaveStatus::Saving,
                },
            ]
        );
        assert_eq!(events.try_next(), None);
    }

    #[tokio::test]
    async fn next_ends_when_bus_dropped() {
        let bus = EventBus::new(4);
        let mut events = bus.subscribe();
        bus.publish(started(GenerationKind::Persona));
        drop(bus);

        assert_eq!(events.next().await, Some(started(GenerationKind::Persona)));
        assert_eq!(events.next().await, None);
    }
}
