//! A thread-local, type-erased key-value store for simulation-wide state.
//!
//! `anykv` gives processes and harness code a place to stash ad-hoc counters,
//! accumulators, or scratch state that doesn't belong on any single process
//! struct (e.g. aggregate statistics gathered across all processes during a
//! run). Keys are plain strings; values are recovered via the expected type,
//! panicking on a type mismatch since that always indicates a programming
//! error, not a runtime condition.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    pub(crate) static ANY_KV: RefCell<HashMap<String, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

pub fn set<T: 'static>(key: &str, value: T) {
    ANY_KV.with(|m| {
        m.borrow_mut().insert(key.to_string(), Box::new(value));
    });
}

pub fn get<T: 'static + Clone>(key: &str) -> T {
    ANY_KV.with(|m| {
        m.borrow()
            .get(key)
            .expect("No key")
            .downcast_ref::<T>()
            .cloned()
            .expect("Wrong type cast")
    })
}

pub fn modify<T: 'static>(key: &str, f: impl FnOnce(&mut T)) {
    ANY_KV.with(|m| {
        f(m.borrow_mut()
            .get_mut(key)
            .expect("No key")
            .downcast_mut::<T>()
            .expect("Wrong type cast"));
    });
}

pub(crate) fn drop_anykv() {
    ANY_KV.take();
}
