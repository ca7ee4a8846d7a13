//! Category-scoped, multi-subscriber event dispatch.

use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use derive_more::{From, Into};

use crate::events::{
    ActivateEvent, DatafileChangeEvent, DecisionEvent, EventCategory, LogEvent, Notification,
    TrackEvent,
};

/// Identifier of one subscription.
///
/// Ids are unique across the whole center for its lifetime and are never
/// reused, so a stale id held after [`unsubscribe`] or
/// [`clear`](NotificationCenter::clear) can never remove someone else's
/// subscription.
///
/// [`unsubscribe`]: NotificationCenter::unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&Notification) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    callback: Callback,
}

struct Registrations {
    next_id: u64,
    channels: HashMap<EventCategory, Vec<Subscription>>,
}

/// Decouples event producers (host internals) from consumers (arbitrary
/// subscriber callbacks) via category-scoped synchronous dispatch.
///
/// [`notify`](NotificationCenter::notify) snapshots the subscriber list for
/// the category before invoking the first callback and runs every callback
/// with no lock held. Callbacks may therefore subscribe, unsubscribe, or
/// notify again — including for the same category — without deadlocking;
/// registration changes made by a callback take effect from the next
/// dispatch, never the in-flight one.
///
/// # Examples
/// ```
/// use relay_core::{EventCategory, Notification, NotificationCenter};
///
/// let center = NotificationCenter::new();
/// let id = center.subscribe(EventCategory::from("decision"), |notification| {
///     println!("{:?}", notification);
/// });
/// center.notify(
///     EventCategory::from("decision"),
///     Notification::Custom(serde_json::json!({"flag": "x"})),
/// );
/// assert!(center.unsubscribe(id));
/// ```
pub struct NotificationCenter {
    inner: Mutex<Registrations>,
}

impl NotificationCenter {
    /// Create an empty notification center.
    pub fn new() -> Self {
        NotificationCenter {
            inner: Mutex::new(Registrations {
                next_id: 1,
                channels: HashMap::new(),
            }),
        }
    }

    /// Register `listener` for events of `category`.
    ///
    /// The listener is appended after the category's existing subscriptions
    /// and keeps receiving events until unsubscribed or cleared. Returns a
    /// freshly allocated id. Registration never fails; nothing bounds the
    /// number of subscriptions, so hosts that never unsubscribe leak them
    /// (see [`subscription_count`](NotificationCenter::subscription_count)).
    pub fn subscribe(
        &self,
        category: EventCategory,
        listener: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.channels.entry(category).or_default().push(Subscription {
            id,
            callback: Arc::new(listener),
        });

        log::trace!(target: "relay", subscription_id = id.0; "registered notification listener");
        id
    }

    /// Remove the subscription with the given id from whichever category
    /// holds it.
    ///
    /// Returns whether a subscription was found and removed; unknown ids are
    /// not an error. The relative order of the remaining subscriptions is
    /// untouched in every category.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        for subscriptions in inner.channels.values_mut() {
            if let Some(position) = subscriptions.iter().position(|s| s.id == id) {
                subscriptions.remove(position);
                return true;
            }
        }
        false
    }

    /// Remove all subscriptions of one category.
    pub fn clear_category(&self, category: &EventCategory) {
        self.lock().channels.remove(category);
    }

    /// Remove all subscriptions from all categories.
    pub fn clear(&self) {
        self.lock().channels.clear();
    }

    /// Total number of live subscriptions across all categories.
    ///
    /// Nothing caps this number, so a host that subscribes without matching
    /// unsubscribes grows it forever. Watch it if subscriptions are created
    /// dynamically.
    pub fn subscription_count(&self) -> usize {
        self.lock().channels.values().map(Vec::len).sum()
    }

    /// Deliver `notification` to every current subscriber of `category`,
    /// synchronously, in registration order.
    ///
    /// A category with no subscribers is a no-op. A panicking callback is
    /// caught, reported through the `log` facade at error level, and does not
    /// prevent delivery to the remaining subscribers. Each subscriber in the
    /// snapshot is invoked exactly once per dispatch.
    pub fn notify(&self, category: EventCategory, notification: Notification) {
        // Snapshot under the lock, invoke with the lock released. Reentrant
        // calls from callbacks see the center, not this dispatch.
        let snapshot: Vec<(SubscriptionId, Callback)> = {
            let inner = self.lock();
            match inner.channels.get(&category) {
                Some(subscriptions) => subscriptions
                    .iter()
                    .map(|s| (s.id, Arc::clone(&s.callback)))
                    .collect(),
                None => return,
            }
        };

        log::trace!(
            target: "relay",
            listeners = snapshot.len(),
            notification:serde;
            "dispatching {} notification",
            category,
        );

        for (id, callback) in snapshot {
            let delivery = panic::catch_unwind(AssertUnwindSafe(|| callback(&notification)));
            if let Err(payload) = delivery {
                log::error!(
                    target: "relay",
                    subscription_id = id.0;
                    "listener for {} notifications panicked: {}",
                    category,
                    panic_message(payload.as_ref()),
                );
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registrations> {
        // Callbacks run with the lock released, so a panicking listener
        // cannot poison it. Recover rather than take the host down.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        NotificationCenter::new()
    }
}

/// Typed listener adapters and emitters over the generic surface.
///
/// Each `subscribe_*` registers under the matching well-known category and
/// silently ignores payloads of any other shape dispatched there.
impl NotificationCenter {
    /// Register a listener receiving only [`ActivateEvent`]s.
    pub fn subscribe_activate(
        &self,
        listener: impl Fn(&ActivateEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribe(EventCategory::Activate, move |notification| {
            if let Notification::Activate(event) = notification {
                listener(event);
            }
        })
    }

    /// Register a listener receiving only [`TrackEvent`]s.
    pub fn subscribe_track(
        &self,
        listener: impl Fn(&TrackEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribe(EventCategory::Track, move |notification| {
            if let Notification::Track(event) = notification {
                listener(event);
            }
        })
    }

    /// Register a listener receiving only [`DecisionEvent`]s.
    pub fn subscribe_decision(
        &self,
        listener: impl Fn(&DecisionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribe(EventCategory::Decision, move |notification| {
            if let Notification::Decision(event) = notification {
                listener(event);
            }
        })
    }

    /// Register a listener receiving only [`DatafileChangeEvent`]s.
    pub fn subscribe_datafile_change(
        &self,
        listener: impl Fn(&DatafileChangeEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribe(EventCategory::DatafileChange, move |notification| {
            if let Notification::DatafileChange(event) = notification {
                listener(event);
            }
        })
    }

    /// Register a listener receiving only [`LogEvent`]s.
    pub fn subscribe_log_event(
        &self,
        listener: impl Fn(&LogEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribe(EventCategory::LogEvent, move |notification| {
            if let Notification::LogEvent(event) = notification {
                listener(event);
            }
        })
    }

    /// Dispatch an [`ActivateEvent`] to its subscribers.
    pub fn notify_activate(&self, event: ActivateEvent) {
        self.notify(EventCategory::Activate, Notification::Activate(event));
    }

    /// Dispatch a [`TrackEvent`] to its subscribers.
    pub fn notify_track(&self, event: TrackEvent) {
        self.notify(EventCategory::Track, Notification::Track(event));
    }

    /// Dispatch a [`DecisionEvent`] to its subscribers.
    pub fn notify_decision(&self, event: DecisionEvent) {
        self.notify(EventCategory::Decision, Notification::Decision(event));
    }

    /// Dispatch a [`DatafileChangeEvent`] to its subscribers.
    pub fn notify_datafile_change(&self, event: DatafileChangeEvent) {
        self.notify(
            EventCategory::DatafileChange,
            Notification::DatafileChange(event),
        );
    }

    /// Dispatch a [`LogEvent`] to its subscribers.
    pub fn notify_log_event(&self, event: LogEvent) {
        self.notify(EventCategory::LogEvent, Notification::LogEvent(event));
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
