// Typed write contract

use std::sync::Arc;

use crate::value::Dict;

/// Typed writes to the preference store.
///
/// Writes are total: there is no failure channel. A write replaces whatever
/// was stored under the key, whatever its previous kind.
pub trait PreferenceSetter {
    fn set_bool(&self, key: &str, value: bool);

    fn set_int(&self, key: &str, value: i64);

    fn set_double(&self, key: &str, value: f64);

    fn set_bytes(&self, key: &str, value: Vec<u8>);

    /// Store a dictionary. Entries are limited to storage-compatible kinds
    /// by [`DictValue`](crate::DictValue).
    fn set_dict(&self, key: &str, value: Dict);

    /// Remove whatever is stored under `key`. Subsequent reads are absent.
    fn remove(&self, key: &str);
}

macro_rules! forward_setter {
    ($($ptr:ty),*) => {$(
        impl<T: PreferenceSetter + ?Sized> PreferenceSetter for $ptr {
            fn set_bool(&self, key: &str, value: bool) {
                (**self).set_bool(key, value)
            }

            fn set_int(&self, key: &str, value: i64) {
                (**self).set_int(key, value)
            }

            fn set_double(&self, key: &str, value: f64) {
                (**self).set_double(key, value)
            }

            fn set_bytes(&self, key: &str, value: Vec<u8>) {
                (**self).set_bytes(key, value)
            }

            fn set_dict(&self, key: &str, value: Dict) {
                (**self).set_dict(key, value)
            }

            fn remove(&self, key: &str) {
                (**self).remove(key)
            }
        }
    )*};
}

forward_setter!(&T, Box<T>, Arc<T>);
