//! Typed publish/subscribe bus for document lifecycle hooks.
//!
//! Extensions subscribe to a [`Topic`] and are called synchronously, in subscription
//! order, whenever a matching [`Event`] is published. Each subscriber gets mutable access
//! to the publishing context (the `Document`), so it can write objects or register
//! resources at exactly the right point of serialization.
//!
//! A subscriber that returns an error is logged and skipped; the remaining subscribers
//! still run. Subscriptions made with `once = true` are dropped after their first call,
//! whether or not it failed.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Result returned by subscriber callbacks.
pub type SubscriberResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Boxed subscriber callback.
pub type Callback<C> = Box<dyn FnMut(&mut C, &Event) -> SubscriberResult>;

/// Lifecycle points a subscriber can hook.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// The document finished construction
    Initialized,
    /// A page was appended
    AddPage,
    /// A page dictionary is being written (before `/Contents`)
    PutPage,
    /// `output()` started, before the header is written
    BuildDocument,
    /// The page tree was written
    PostPutPages,
    /// Additional objects are about to be flushed
    PutAdditionalObjects,
    /// Additional objects were flushed
    PostPutAdditionalObjects,
    /// Resource objects were written, the shared dictionary is next
    PutResources,
    /// The shared resource dictionary was written
    PostPutResources,
    /// The catalog dictionary is open
    PutCatalog,
    /// A font object is about to be written
    PutFont,
    /// A font was registered
    AddFont,
    /// A graphics state was registered
    AddGState,
    /// A pattern was registered
    AddPattern,
    /// A form object was registered
    AddFormObject,
    /// A tiling pattern recording ended
    EndTilingPattern,
    /// The `/XObject` sub-dictionary is open
    PutXObjectDict,
    /// The `/ExtGState` sub-dictionary is open
    PutGStateDict,
    /// The `/Shading` sub-dictionary is open
    PutShadingPatternDict,
    /// The `/Pattern` sub-dictionary is open
    PutTilingPatternDict,
    /// Extension-defined topic
    Custom(String),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Custom(name) => write!(f, "custom:{}", name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// An event with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// See [`Topic::Initialized`]
    Initialized,
    /// See [`Topic::AddPage`]
    AddPage {
        /// 1-based number of the new page
        page_number: usize,
    },
    /// See [`Topic::PutPage`]
    PutPage {
        /// 1-based page number
        page_number: usize,
        /// Object number of the page dictionary
        obj_id: u32,
        /// Object number of the content stream
        contents_obj_id: u32,
    },
    /// See [`Topic::BuildDocument`]
    BuildDocument,
    /// See [`Topic::PostPutPages`]
    PostPutPages,
    /// See [`Topic::PutAdditionalObjects`]
    PutAdditionalObjects,
    /// See [`Topic::PostPutAdditionalObjects`]
    PostPutAdditionalObjects,
    /// See [`Topic::PutResources`]
    PutResources,
    /// See [`Topic::PostPutResources`]
    PostPutResources,
    /// See [`Topic::PutCatalog`]
    PutCatalog,
    /// See [`Topic::PutFont`]
    PutFont {
        /// Font resource name (`F1`, ...)
        key: String,
    },
    /// See [`Topic::AddFont`]
    AddFont {
        /// Font resource name
        key: String,
    },
    /// See [`Topic::AddGState`]
    AddGState {
        /// User-facing key
        key: String,
        /// Resource name (`GS1`, ...)
        name: String,
    },
    /// See [`Topic::AddPattern`]
    AddPattern {
        /// User-facing key
        key: String,
        /// Resource name (`Sh1`, `P2`, ...)
        name: String,
    },
    /// See [`Topic::AddFormObject`]
    AddFormObject {
        /// User-facing key
        key: String,
        /// Resource name (`Xo1`, ...)
        name: String,
    },
    /// See [`Topic::EndTilingPattern`]
    EndTilingPattern {
        /// User-facing key
        key: String,
        /// Resource name
        name: String,
    },
    /// See [`Topic::PutXObjectDict`]
    PutXObjectDict,
    /// See [`Topic::PutGStateDict`]
    PutGStateDict,
    /// See [`Topic::PutShadingPatternDict`]
    PutShadingPatternDict,
    /// See [`Topic::PutTilingPatternDict`]
    PutTilingPatternDict,
    /// See [`Topic::Custom`]
    Custom {
        /// Topic name
        name: String,
        /// Free-form payload
        payload: Option<String>,
    },
}

impl Event {
    /// The topic this event is delivered on.
    pub fn topic(&self) -> Topic {
        match self {
            Event::Initialized => Topic::Initialized,
            Event::AddPage { .. } => Topic::AddPage,
            Event::PutPage { .. } => Topic::PutPage,
            Event::BuildDocument => Topic::BuildDocument,
            Event::PostPutPages => Topic::PostPutPages,
            Event::PutAdditionalObjects => Topic::PutAdditionalObjects,
            Event::PostPutAdditionalObjects => Topic::PostPutAdditionalObjects,
            Event::PutResources => Topic::PutResources,
            Event::PostPutResources => Topic::PostPutResources,
            Event::PutCatalog => Topic::PutCatalog,
            Event::PutFont { .. } => Topic::PutFont,
            Event::AddFont { .. } => Topic::AddFont,
            Event::AddGState { .. } => Topic::AddGState,
            Event::AddPattern { .. } => Topic::AddPattern,
            Event::AddFormObject { .. } => Topic::AddFormObject,
            Event::EndTilingPattern { .. } => Topic::EndTilingPattern,
            Event::PutXObjectDict => Topic::PutXObjectDict,
            Event::PutGStateDict => Topic::PutGStateDict,
            Event::PutShadingPatternDict => Topic::PutShadingPatternDict,
            Event::PutTilingPatternDict => Topic::PutTilingPatternDict,
            Event::Custom { name, .. } => Topic::Custom(name.clone()),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

pub(crate) struct Subscriber<C> {
    token: u64,
    once: bool,
    callback: Callback<C>,
}

/// Per-document subscriber registry.
pub struct EventBus<C> {
    topics: IndexMap<Topic, Vec<Subscriber<C>>>,
    next_token: u64,
    // tokens whose subscribers are currently out for dispatch
    in_flight: Vec<u64>,
    cancelled: Vec<u64>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.topics.keys().collect::<Vec<_>>())
            .field("next_token", &self.next_token)
            .finish()
    }
}

impl<C> EventBus<C> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            topics: IndexMap::new(),
            next_token: 1,
            in_flight: Vec::new(),
            cancelled: Vec::new(),
        }
    }

    /// Register `callback` for `topic`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a custom topic with an empty name.
    pub fn subscribe<F>(&mut self, topic: Topic, callback: F, once: bool) -> Result<SubscriptionToken>
    where
        F: FnMut(&mut C, &Event) -> SubscriberResult + 'static,
    {
        if let Topic::Custom(name) = &topic {
            if name.trim().is_empty() {
                return Err(Error::invalid_argument(
                    "Invalid arguments passed to EventBus::subscribe: topic name is empty",
                ));
            }
        }

        let token = self.next_token;
        self.next_token += 1;
        log::trace!("subscribe {} -> token {}", topic, token);
        self.topics.entry(topic).or_default().push(Subscriber {
            token,
            once,
            callback: Box::new(callback),
        });
        Ok(SubscriptionToken(token))
    }

    /// Remove a subscription. Returns `false` if the token is unknown.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let id = token.0;
        if self.in_flight.contains(&id) {
            self.cancelled.push(id);
            return true;
        }

        let mut emptied = None;
        let mut found = false;
        for (topic, subscribers) in self.topics.iter_mut() {
            if let Some(pos) = subscribers.iter().position(|s| s.token == id) {
                subscribers.remove(pos);
                found = true;
                if subscribers.is_empty() {
                    emptied = Some(topic.clone());
                }
                break;
            }
        }
        if let Some(topic) = emptied {
            self.topics.shift_remove(&topic);
        }
        found
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Number of subscribers for `topic`.
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Deliver `event` to its subscribers with `ctx` as their context.
    ///
    /// Use [`publish_within`] when the bus is owned by the context itself.
    pub fn publish(&mut self, ctx: &mut C, event: &Event) {
        let topic = event.topic();
        let mut subscribers = self.detach(&topic);
        let spent = dispatch(&mut subscribers, ctx, event, &topic);
        self.reattach(topic, subscribers, &spent);
    }

    pub(crate) fn detach(&mut self, topic: &Topic) -> Vec<Subscriber<C>> {
        let subscribers = self.topics.get_mut(topic).map(std::mem::take).unwrap_or_default();
        self.in_flight.extend(subscribers.iter().map(|s| s.token));
        subscribers
    }

    pub(crate) fn reattach(&mut self, topic: Topic, mut subscribers: Vec<Subscriber<C>>, spent: &[u64]) {
        let cancelled = std::mem::take(&mut self.cancelled);
        self.in_flight.retain(|t| !subscribers.iter().any(|s| s.token == *t));
        subscribers.retain(|s| !spent.contains(&s.token) && !cancelled.contains(&s.token));
        // cancellations aimed at other in-flight dispatches stay pending
        self.cancelled = cancelled
            .into_iter()
            .filter(|t| self.in_flight.contains(t))
            .collect();

        // subscriptions added while dispatching go after the existing ones
        let added = self.topics.shift_remove(&topic).unwrap_or_default();
        subscribers.extend(added);
        if !subscribers.is_empty() {
            self.topics.insert(topic, subscribers);
        }
    }
}

fn dispatch<C>(subscribers: &mut [Subscriber<C>], ctx: &mut C, event: &Event, topic: &Topic) -> Vec<u64> {
    let mut spent = Vec::new();
    for subscriber in subscribers.iter_mut() {
        if let Err(err) = (subscriber.callback)(ctx, event) {
            log::error!("event subscriber for {} failed: {}", topic, err);
        }
        if subscriber.once {
            spent.push(subscriber.token);
        }
    }
    spent
}

/// Publish `event` on the bus that `ctx` itself owns.
///
/// The topic's subscribers are taken out of the bus for the duration of the call, so
/// they can receive `&mut C` while the bus stays reachable for new subscriptions.
pub fn publish_within<C>(ctx: &mut C, bus: fn(&mut C) -> &mut EventBus<C>, event: &Event) {
    let topic = event.topic();
    let mut subscribers = bus(ctx).detach(&topic);
    let spent = dispatch(&mut subscribers, ctx, event, &topic);
    bus(ctx).reattach(topic, subscribers, &spent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        calls: Vec<String>,
    }

    #[test]
    fn test_subscribers_run_in_order() {
        let mut bus: EventBus<Log> = EventBus::new();
        let mut log = Log::default();
        bus.subscribe(Topic::AddPage, |l: &mut Log, _e: &Event| {
            l.calls.push("first".into());
            Ok(())
        }, false)
        .unwrap();
        bus.subscribe(Topic::AddPage, |l: &mut Log, e: &Event| {
            if let Event::AddPage { page_number } = e {
                l.calls.push(format!("second:{}", page_number));
            }
            Ok(())
        }, false)
        .unwrap();

        bus.publish(&mut log, &Event::AddPage { page_number: 2 });
        assert_eq!(log.calls, vec!["first", "second:2"]);
    }

    #[test]
    fn test_failing_subscriber_is_isolated() {
        let mut bus: EventBus<Log> = EventBus::new();
        let mut log = Log::default();
        bus.subscribe(Topic::PutCatalog, |_l: &mut Log, _e: &Event| Err("boom".into()), false)
            .unwrap();
        bus.subscribe(Topic::PutCatalog, |l: &mut Log, _e: &Event| {
            l.calls.push("ran".into());
            Ok(())
        }, false)
        .unwrap();

        bus.publish(&mut log, &Event::PutCatalog);
        assert_eq!(log.calls, vec!["ran"]);
    }

    #[test]
    fn test_once_is_removed_even_on_error() {
        let mut bus: EventBus<Log> = EventBus::new();
        let mut log = Log::default();
        bus.subscribe(Topic::BuildDocument, |l: &mut Log, _e: &Event| {
            l.calls.push("once".into());
            Err("fails".into())
        }, true)
        .unwrap();

        bus.publish(&mut log, &Event::BuildDocument);
        bus.publish(&mut log, &Event::BuildDocument);
        assert_eq!(log.calls, vec!["once"]);
        assert_eq!(bus.topic_count(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus: EventBus<Log> = EventBus::new();
        let mut log = Log::default();
        let token = bus
            .subscribe(Topic::AddFont, |l: &mut Log, _e: &Event| {
                l.calls.push("font".into());
                Ok(())
            }, false)
            .unwrap();
        assert!(bus.unsubscribe(token));
        assert!(!bus.unsubscribe(token));
        bus.publish(&mut log, &Event::AddFont { key: "F15".into() });
        assert!(log.calls.is_empty());
    }

    #[test]
    fn test_empty_custom_topic_rejected() {
        let mut bus: EventBus<Log> = EventBus::new();
        let err = bus
            .subscribe(Topic::Custom(" ".into()), |_l: &mut Log, _e: &Event| Ok(()), false)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid arguments passed to EventBus::subscribe"));
    }

    #[test]
    fn test_custom_topics_are_distinct() {
        let mut bus: EventBus<Log> = EventBus::new();
        let mut log = Log::default();
        bus.subscribe(Topic::Custom("a".into()), |l: &mut Log, _e: &Event| {
            l.calls.push("a".into());
            Ok(())
        }, false)
        .unwrap();
        bus.publish(&mut log, &Event::Custom { name: "b".into(), payload: None });
        assert!(log.calls.is_empty());
        bus.publish(&mut log, &Event::Custom { name: "a".into(), payload: None });
        assert_eq!(log.calls, vec!["a"]);
    }

    struct Owner {
        bus: EventBus<Owner>,
        seen: usize,
    }

    fn owner_bus(owner: &mut Owner) -> &mut EventBus<Owner> {
        &mut owner.bus
    }

    #[test]
    fn test_publish_within_owner_and_subscribe_during_dispatch() {
        let mut owner = Owner { bus: EventBus::new(), seen: 0 };
        owner
            .bus
            .subscribe(Topic::PostPutPages, |o: &mut Owner, _e: &Event| {
                o.seen += 1;
                o.bus.subscribe(Topic::PostPutPages, |o: &mut Owner, _e: &Event| {
                    o.seen += 10;
                    Ok(())
                }, true)?;
                Ok(())
            }, true)
            .unwrap();

        publish_within(&mut owner, owner_bus, &Event::PostPutPages);
        assert_eq!(owner.seen, 1);
        publish_within(&mut owner, owner_bus, &Event::PostPutPages);
        assert_eq!(owner.seen, 11);
        assert_eq!(owner.bus.subscriber_count(&Topic::PostPutPages), 0);
    }
}
