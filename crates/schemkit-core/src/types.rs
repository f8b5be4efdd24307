//! Type aliases for shared state.
//!
//! The scene graph lives on a single event-handling thread and is shared with
//! `Rc<RefCell<T>>`; caches that async tasks may touch use `Arc<Mutex<T>>`.

use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// Non-owning counterpart of [`Shared`].
pub type WeakShared<T> = Weak<RefCell<T>>;

/// A thread-safe hash map for cross-task key-value storage.
pub type ThreadSafeMap<K, V> = Arc<Mutex<HashMap<K, V>>>;

/// Creates a new shared value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Creates a new empty thread-safe map.
#[inline]
pub fn thread_safe_map<K, V>() -> ThreadSafeMap<K, V> {
    Arc::new(Mutex::new(HashMap::new()))
}
