//! Per-instance listener slots.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Listeners keyed by the instance that registered them.
///
/// Single-threaded; meant to live in a `thread_local!` next to JS objects.
#[derive(Debug)]
pub struct ListenerRegistry<L> {
    next_id: Cell<u32>,
    listeners: RefCell<HashMap<u32, L>>,
}

impl<L: Clone> ListenerRegistry<L> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// Reserve an id for a new instance.
    pub fn allocate(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    /// Replace the listener of `id`; `None` clears it.
    pub fn set(&self, id: u32, listener: Option<L>) {
        let mut listeners = self.listeners.borrow_mut();
        match listener {
            Some(listener) => {
                listeners.insert(id, listener);
            }
            None => {
                listeners.remove(&id);
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<L> {
        self.listeners.borrow().get(&id).cloned()
    }

    pub fn release(&self, id: u32) {
        self.listeners.borrow_mut().remove(&id);
    }
}

impl<L: Clone> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}
