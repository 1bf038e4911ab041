//! Opaque handles and the native-side registry behind them
//!
//! A [`NativeHandle`] identifies a native-owned object across the dispatch
//! boundary. The managed side holds it as an inert token and passes it back
//! unmodified on every callback; only the native side that minted it may
//! interpret it.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque token identifying a native-owned object instance.
///
/// Minted by native code (see [`HandleRegistry`]), carried through the
/// managed layer unchanged. The bridge performs no liveness validation:
/// dispatching a handle the native side already invalidated is a contract
/// violation the backend must handle defensively.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(u64);

impl NativeHandle {
    /// Wrap a raw handle value minted by native code
    pub const fn from_raw(raw: u64) -> Self {
        NativeHandle(raw)
    }

    /// Get the raw handle value, e.g. to pass across a C ABI
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Thread-safe registry mapping handles to native-owned objects.
///
/// This is the arena behind [`NativeHandle`]: backends insert an object to
/// mint a handle and look the object up again on each dispatch. Handles are
/// auto-incrementing and never reused, so a lookup after `remove` returns
/// `None` instead of aliasing a newer object.
pub struct HandleRegistry<T> {
    map: DashMap<u64, T>,
    next_id: AtomicU64,
}

impl<T> HandleRegistry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert an object and mint its handle.
    pub fn insert(&self, value: T) -> NativeHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.map.insert(id, value);
        NativeHandle(id)
    }

    /// Get a reference to the object behind a handle.
    pub fn get(&self, handle: NativeHandle) -> Option<dashmap::mapref::one::Ref<'_, u64, T>> {
        self.map.get(&handle.0)
    }

    /// Get a mutable reference to the object behind a handle.
    pub fn get_mut(
        &self,
        handle: NativeHandle,
    ) -> Option<dashmap::mapref::one::RefMut<'_, u64, T>> {
        self.map.get_mut(&handle.0)
    }

    /// Invalidate a handle, returning the object it referred to.
    pub fn remove(&self, handle: NativeHandle) -> Option<T> {
        self.map.remove(&handle.0).map(|(_, value)| value)
    }

    /// Check whether a handle is currently live.
    pub fn contains(&self, handle: NativeHandle) -> bool {
        self.map.contains_key(&handle.0)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
