//! Change notifications published by the [`DataModel`].
//!
//! Delivery is synchronous and follows registration order. Listeners receive
//! a read-only view of the model together with the event, after the mutation
//! that caused it has fully completed.

use std::rc::Rc;

use crate::data::model::{ColumnId, Tuple};
use crate::state::DataModel;

/// What changed in the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// Tuples or columns were replaced, removed or renamed, or a regression ran.
    DataModelChanged,
    /// The queried subset and the query statistics were recomputed.
    QueryChanged,
    HighlightedColumnChanged,
    /// Tuples were appended; carries copies of the new tuples.
    TuplesAdded(Vec<Tuple>),
    ColumnDisabled(ColumnId),
    /// One batch of columns was disabled.
    ColumnsDisabled(Vec<ColumnId>),
    ColumnEnabled(ColumnId),
}

/// Receives model notifications.
pub trait DataModelListener {
    fn on_event(&self, model: &DataModel, event: ModelEvent);
}

// ---------------------------------------------------------------------------
// ListenerRegistry
// ---------------------------------------------------------------------------

/// Subscribers, identified by pointer identity.
#[derive(Default, Clone)]
pub struct ListenerRegistry {
    listeners: Vec<Rc<dyn DataModelListener>>,
}

impl ListenerRegistry {
    /// Register a listener. Returns `false` if it was already registered.
    pub fn add(&mut self, listener: Rc<dyn DataModelListener>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove(&mut self, listener: &Rc<dyn DataModelListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    pub fn contains(&self, listener: &Rc<dyn DataModelListener>) -> bool {
        self.listeners.iter().any(|l| Rc::ptr_eq(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` to every listener in registration order.
    pub fn notify(&self, model: &DataModel, event: &ModelEvent) {
        for listener in &self.listeners {
            listener.on_event(model, event.clone());
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        tag: &'static str,
        log: Rc<RefCell<Vec<(&'static str, ModelEvent)>>>,
    }

    impl DataModelListener for Recorder {
        fn on_event(&self, _model: &DataModel, event: ModelEvent) {
            self.log.borrow_mut().push((self.tag, event));
        }
    }

    #[test]
    fn duplicate_registration_is_a_noop() {
        let mut registry = ListenerRegistry::default();
        let listener: Rc<dyn DataModelListener> = Rc::new(Recorder::default());

        assert!(registry.add(listener.clone()));
        assert!(!registry.add(listener.clone()));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&listener));
        assert!(!registry.remove(&listener));
        assert!(registry.is_empty());
    }

    #[test]
    fn delivers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::default();
        for tag in ["first", "second"] {
            registry.add(Rc::new(Recorder {
                tag,
                log: log.clone(),
            }));
        }

        let model = DataModel::new();
        registry.notify(&model, &ModelEvent::ColumnEnabled(ColumnId(2)));

        let log = log.borrow();
        assert_eq!(
            *log,
            vec![
                ("first", ModelEvent::ColumnEnabled(ColumnId(2))),
                ("second", ModelEvent::ColumnEnabled(ColumnId(2))),
            ]
        );
    }
}
