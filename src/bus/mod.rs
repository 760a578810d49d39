//! In-process event bus — notifications out, control signals in.
//!
//! The monitor publishes [`BusEvent::Notification`] and subscribes to
//! [`BusEvent::ProcessLifecycle`] and [`BusEvent::CopyTriggered`].
//! Delivery runs on the publishing thread against a snapshot of the
//! subscriber list; the registry lock is never held while a subscriber
//! runs, so callbacks may publish or (un)subscribe themselves.
//!
//! Async consumers attach through [`ChannelSubscriber`], which forwards
//! into a tokio channel and returns immediately.

mod channel;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;

use crate::clipboard::ContentSnapshot;

pub use channel::ChannelSubscriber;

/// Payload for exactly one detected clipboard change.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub content: ContentSnapshot,
}

/// Serializable view of a notification, without pixel data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotificationSummary {
    Text { text: String },
    Image { width: usize, height: usize },
}

impl NotificationEvent {
    pub fn summary(&self) -> NotificationSummary {
        match &self.content {
            ContentSnapshot::Text(text) => NotificationSummary::Text { text: text.clone() },
            ContentSnapshot::Image(img) => NotificationSummary::Image {
                width: img.width,
                height: img.height,
            },
        }
    }
}

/// Everything that travels over the bus.
#[derive(Debug, Clone)]
pub enum BusEvent {
    /// New clipboard content was detected.
    Notification(NotificationEvent),
    /// A processing cycle started (`is_start`) or finished.
    ProcessLifecycle { is_start: bool },
    /// The user copied original or processed text through the app.
    CopyTriggered,
}

/// Receives every event published on the bus.
///
/// Called synchronously on the publisher's thread. Notifications are
/// published from the monitor thread, so a subscriber that blocks
/// stalls clipboard polling until it returns. Slow consumers should
/// hand events off, as [`ChannelSubscriber`] does.
pub trait Subscriber: Send + Sync {
    fn on_event(&self, event: &BusEvent);
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Publish/subscribe registry.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<(SubscriptionId, Arc<dyn Subscriber>)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. It receives every event published after
    /// this call returns.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.subscribers.write().push((id, subscriber));
        tracing::debug!(?id, "bus subscriber added");
        id
    }

    /// Remove a subscriber. Idempotent: returns `false` if `id` was
    /// not (or no longer) registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.write();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        let removed = subs.len() != before;
        if removed {
            tracing::debug!(?id, "bus subscriber removed");
        }
        removed
    }

    /// Deliver `event` to every current subscriber, in subscription order.
    /// Returns once the last subscriber's callback has returned.
    pub fn publish(&self, event: &BusEvent) {
        let targets: Vec<Arc<dyn Subscriber>> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();

        for subscriber in targets {
            subscriber.on_event(event);
        }
    }

    #[allow(dead_code)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    use crate::clipboard::ImageContent;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Subscriber for Recorder {
        fn on_event(&self, event: &BusEvent) {
            let label = match event {
                BusEvent::Notification(n) => format!("note:{}", n.content.describe()),
                BusEvent::ProcessLifecycle { is_start } => format!("lifecycle:{is_start}"),
                BusEvent::CopyTriggered => "copy".to_string(),
            };
            self.seen.lock().push(label);
        }
    }

    #[test]
    fn publish_reaches_all_subscribers_in_order() {
        let bus = EventBus::new();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        bus.subscribe(a.clone());
        bus.subscribe(b.clone());

        bus.publish(&BusEvent::ProcessLifecycle { is_start: true });
        bus.publish(&BusEvent::CopyTriggered);

        let expected = vec!["lifecycle:true".to_string(), "copy".to_string()];
        assert_eq!(*a.seen.lock(), expected);
        assert_eq!(*b.seen.lock(), expected);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let bus = EventBus::new();
        let rec = Arc::new(Recorder::default());
        let id = bus.subscribe(rec.clone());
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);

        bus.publish(&BusEvent::CopyTriggered);
        assert!(rec.seen.lock().is_empty());
    }

    #[test]
    fn subscription_ids_are_unique() {
        let bus = EventBus::new();
        let a = bus.subscribe(Arc::new(Recorder::default()));
        let b = bus.subscribe(Arc::new(Recorder::default()));
        assert_ne!(a, b);
    }

    /// Subscriber that republishes lifecycle events as copy events from
    /// inside its callback.
    struct Relay {
        bus: Arc<EventBus>,
    }

    impl Subscriber for Relay {
        fn on_event(&self, event: &BusEvent) {
            if matches!(event, BusEvent::ProcessLifecycle { .. }) {
                self.bus.publish(&BusEvent::CopyTriggered);
            }
        }
    }

    #[test]
    fn subscribers_may_publish_reentrantly() {
        let bus = Arc::new(EventBus::new());
        let rec = Arc::new(Recorder::default());
        bus.subscribe(Arc::new(Relay { bus: Arc::clone(&bus) }));
        bus.subscribe(rec.clone());

        bus.publish(&BusEvent::ProcessLifecycle { is_start: false });

        assert_eq!(
            *rec.seen.lock(),
            vec!["copy".to_string(), "lifecycle:false".to_string()]
        );
    }

    #[test]
    fn channel_subscriber_does_not_wait_for_consumer() {
        let bus = EventBus::new();
        let (sink, mut rx) = ChannelSubscriber::new();
        bus.subscribe(Arc::new(sink));

        // Nothing is receiving yet; every publish still returns.
        for i in 0..100 {
            bus.publish(&BusEvent::Notification(NotificationEvent {
                content: ContentSnapshot::Text(format!("n{i}")),
            }));
        }
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 100);
    }

    #[test]
    fn summary_omits_pixels() {
        let text = NotificationEvent {
            content: ContentSnapshot::Text("hi".into()),
        };
        assert_eq!(
            text.summary(),
            NotificationSummary::Text { text: "hi".into() }
        );

        let image = NotificationEvent {
            content: ContentSnapshot::Image(ImageContent {
                width: 2,
                height: 5,
                pixels: vec![0u8; 40].into(),
            }),
        };
        assert_eq!(
            image.summary(),
            NotificationSummary::Image {
                width: 2,
                height: 5
            }
        );
    }

    #[test]
    fn summary_serializes_with_kind_tag() {
        let json = serde_json::to_string(&NotificationSummary::Image {
            width: 4,
            height: 3,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"image","width":4,"height":3}"#);
    }
}
