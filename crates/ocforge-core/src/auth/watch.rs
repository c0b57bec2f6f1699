//! Shared session broadcast for `AuthProvider` implementations.

use ocforge_types::user::Session;
use tokio::sync::watch;

/// Holds the active session and notifies subscribers when it changes.
///
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct SessionWatch {
    sender: watch::Sender<Option<Session>>,
}

impl SessionWatch {
    pub fn new(initial: Option<Session>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Snapshot of the active session.
    pub fn current(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }

    /// Replace the active session, notifying subscribers only on change.
    pub fn publish(&self, session: Option<Session>) {
        self.sender.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for SessionWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionWatch")
            .field("signed_in", &self.sender.borrow().is_some())
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ocforge_types::user::{User, UserId};

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            user: User {
                id: UserId::new(),
                email: "ael@forge.io".to_string(),
                created_at: Utc::now(),
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscriber_sees_sign_in_and_sign_out() {
        let watch = SessionWatch::default();
        let mut rx = watch.subscribe();

        watch.publish(Some(session()));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        watch.publish(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn republishing_same_session_does_not_notify() {
        let s = session();
        let watch = SessionWatch::new(Some(s.clone()));
        let rx = watch.subscribe();
        watch.publish(Some(s));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn current_reflects_latest_publish() {
        let watch = SessionWatch::default();
        assert!(watch.current().is_none());
        watch.publish(Some(session()));
        assert_eq!(watch.current().unwrap().user.email, "ael@forge.io");
    }
}
