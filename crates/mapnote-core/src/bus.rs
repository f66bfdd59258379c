//! Synchronous publish/subscribe dispatcher.
//!
//! The bus is single-threaded: listeners run on the emitting call stack, in
//! subscription order, and `emit` returns only after every listener ran.

use crate::events::{EditorEvent, EventKind};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use thiserror::Error;

/// Failure reported by a listener.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ListenerError(String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Return type of every listener.
pub type HandlerResult = Result<(), ListenerError>;

type Handler = Box<dyn FnMut(&EditorEvent) -> HandlerResult>;

/// Handle for unsubscribing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

struct Listener {
    id: SubscriptionId,
    /// `None` receives every event.
    filter: Option<EventKind>,
    once: bool,
    handler: RefCell<Handler>,
}

impl Listener {
    fn matches(&self, kind: EventKind) -> bool {
        self.filter.is_none_or(|f| f == kind)
    }
}

/// Typed event bus.
pub struct EventBus {
    listeners: RefCell<Vec<Rc<Listener>>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &format!("<{} listeners>", self.listener_count()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Subscribe to one kind of event.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) -> HandlerResult + 'static,
    {
        self.register(Some(kind), false, Box::new(handler))
    }

    /// Subscribe to every event.
    pub fn on_any<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) -> HandlerResult + 'static,
    {
        self.register(None, false, Box::new(handler))
    }

    /// Subscribe for a single delivery of `kind`.
    ///
    /// The listener is removed before it runs, so it is gone afterwards even
    /// if it fails.
    pub fn once<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&EditorEvent) -> HandlerResult + 'static,
    {
        self.register(Some(kind), true, Box::new(handler))
    }

    /// Remove a listener. Returns true if it was registered.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        let removed = listeners.len() != before;
        if removed {
            log::debug!("{} removed", id);
        }
        removed
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver an event to every matching listener.
    ///
    /// The listener set is captured before the first delivery: listeners
    /// added or removed while emitting take effect from the next `emit`.
    /// A failing listener is logged and reported as an `error` event; the
    /// remaining listeners still run. Returns the number of deliveries.
    pub fn emit(&self, event: &EditorEvent) -> usize {
        let kind = event.kind();
        let snapshot: Vec<Rc<Listener>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.matches(kind))
            .cloned()
            .collect();

        let mut delivered = 0;
        for listener in snapshot {
            if listener.once {
                self.listeners.borrow_mut().retain(|l| l.id != listener.id);
            }

            let Ok(mut guard) = listener.handler.try_borrow_mut() else {
                log::warn!("{} is still handling an event; skipping nested {}", listener.id, kind);
                continue;
            };
            let handler = &mut *guard;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(event)));
            drop(guard);
            delivered += 1;

            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };
            if let Some(message) = failure {
                log::error!("{} failed on {}: {}", listener.id, kind, message);
                if kind != EventKind::Error {
                    self.emit(&EditorEvent::Error { source: kind, message });
                }
            }
        }
        delivered
    }

    fn register(&self, filter: Option<EventKind>, once: bool, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push(Rc::new(Listener {
            id,
            filter,
            once,
            handler: RefCell::new(handler),
        }));
        log::debug!("{} added for {}", id, filter.map_or("*", EventKind::name));
        id
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "listener panicked".to_string()
    }
}
