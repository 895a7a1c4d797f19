// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers para reactividad
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(&T)>;

/// Estado reactivo compartido: los clones ven el mismo valor y los mismos subscribers
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    next_id: Rc<Cell<u64>>,
    subscribers: Rc<RefCell<Vec<(u64, Callback<T>)>>>,
}

impl<T: Clone + PartialEq + 'static> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            next_id: Rc::new(Cell::new(0)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Establecer nuevo valor; solo notifica si cambió
    pub fn set(&self, new_value: T) -> bool {
        {
            let mut current = self.value.borrow_mut();
            if *current == new_value {
                return false;
            }
            *current = new_value;
        }
        self.notify();
        true
    }

    /// Suscribirse a cambios; devuelve el id para desuscribirse
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.subscribers.borrow_mut().retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&self) {
        let value = self.get();
        let callbacks: Vec<Callback<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(&value);
        }
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            next_id: self.next_id.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}
