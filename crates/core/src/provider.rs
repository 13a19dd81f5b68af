//! Provider SPI: the untyped seam between typed adapters and a backing store.
//!
//! A backend implements [`GetterProvider`] and [`SetterProvider`] against
//! whatever it persists to. Both take `&self`; a backend that mutates shared
//! state supplies its own interior mutability and locking.

use std::sync::Arc;

use crate::value::Value;

/// Reads raw values from a backing store.
pub trait GetterProvider {
    /// The value stored under `key`, or `None` if nothing is stored.
    /// Any key is valid, including the empty string.
    fn value(&self, key: &str) -> Option<Value>;
}

/// Writes raw values to a backing store.
pub trait SetterProvider {
    /// Replace whatever is stored under `key`. `None` removes the key.
    fn set(&self, value: Option<Value>, key: &str);
}

impl<T: GetterProvider + ?Sized> GetterProvider for &T {
    fn value(&self, key: &str) -> Option<Value> {
        (**self).value(key)
    }
}

impl<T: GetterProvider + ?Sized> GetterProvider for Box<T> {
    fn value(&self, key: &str) -> Option<Value> {
        (**self).value(key)
    }
}

impl<T: GetterProvider + ?Sized> GetterProvider for Arc<T> {
    fn value(&self, key: &str) -> Option<Value> {
        (**self).value(key)
    }
}

impl<T: SetterProvider + ?Sized> SetterProvider for &T {
    fn set(&self, value: Option<Value>, key: &str) {
        (**self).set(value, key)
    }
}

impl<T: SetterProvider + ?Sized> SetterProvider for Box<T> {
    fn set(&self, value: Option<Value>, key: &str) {
        (**self).set(value, key)
    }
}

impl<T: SetterProvider + ?Sized> SetterProvider for Arc<T> {
    fn set(&self, value: Option<Value>, key: &str) {
        (**self).set(value, key)
    }
}
