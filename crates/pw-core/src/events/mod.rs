use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Dashboard-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Dashboard events
pub mod events {
    use super::Event;
    use crate::record::RecordSet;
    use crate::view::{DisplayMode, ViewId};

    /// Lap table loaded into the store
    #[derive(Debug, Clone)]
    pub struct DataLoaded {
        pub source_name: String,
        pub row_count: usize,
    }

    /// View attached to the coordinator
    #[derive(Debug, Clone)]
    pub struct ViewRegistered {
        pub view_id: ViewId,
        pub view_type: String,
    }

    /// A cascade finished
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        /// View whose gesture produced the candidate, `None` for external resets
        pub origin: Option<ViewId>,
        /// Effective selection handed to the views
        pub selected: RecordSet,
        pub everything: bool,
    }

    #[derive(Debug, Clone)]
    pub struct DisplayModeChanged {
        pub view_id: ViewId,
        pub mode: DisplayMode,
    }

    #[derive(Debug, Clone)]
    pub struct DrillFocusChanged {
        pub view_id: ViewId,
        pub focus: Option<String>,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DataLoaded,
        ViewRegistered,
        SelectionChanged,
        DisplayModeChanged,
        DrillFocusChanged
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        self.handlers.lock().entry(type_id).or_default().push(handler);
    }

    /// Publish an event to every handler registered for its type
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Number of handlers subscribed to `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&std::any::TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event handler wrapping a closure
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

/// Create a handler that only sees events of type `E`
pub fn typed_handler<E, F>(mut f: F) -> Box<dyn EventHandler>
where
    E: Event,
    F: FnMut(&E) + Send + Sync + 'static,
{
    handler_from_fn(move |event| {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            f(event);
        }
    })
}
