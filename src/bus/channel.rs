//! Bridge from bus callbacks to a tokio channel.

use tokio::sync::mpsc;

use super::{BusEvent, NotificationEvent, Subscriber};

/// Forwards notification events into an unbounded tokio channel.
///
/// Sending never blocks, so the monitor thread hands the event off and
/// carries on polling. Control signals are not forwarded.
pub struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl ChannelSubscriber {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Subscriber for ChannelSubscriber {
    fn on_event(&self, event: &BusEvent) {
        if let BusEvent::Notification(n) = event
            && self.tx.send(n.clone()).is_err()
        {
            // Receiver dropped — daemon is shutting down.
            tracing::debug!("notification receiver closed, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ContentSnapshot;

    fn note(text: &str) -> BusEvent {
        BusEvent::Notification(NotificationEvent {
            content: ContentSnapshot::Text(text.into()),
        })
    }

    #[tokio::test]
    async fn forwards_notifications_only() {
        let (sub, mut rx) = ChannelSubscriber::new();

        sub.on_event(&BusEvent::CopyTriggered);
        sub.on_event(&note("first"));
        sub.on_event(&BusEvent::ProcessLifecycle { is_start: true });
        sub.on_event(&note("second"));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(matches!(first.content, ContentSnapshot::Text(ref t) if t == "first"));
        assert!(matches!(second.content, ContentSnapshot::Text(ref t) if t == "second"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_tolerated() {
        let (sub, rx) = ChannelSubscriber::new();
        drop(rx);
        sub.on_event(&note("lost"));
    }
}
