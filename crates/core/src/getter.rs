// Typed read contract

use std::sync::Arc;

use crate::value::Dict;

/// Typed access to stored preferences.
///
/// Every method returns `None` when the key was never written, was removed,
/// or holds a value of a different kind. Callers cannot tell these apart and
/// should treat `None` as an ordinary branch.
pub trait PreferenceGetter {
    fn get_bool(&self, key: &str) -> Option<bool>;

    fn get_int(&self, key: &str) -> Option<i64>;

    fn get_double(&self, key: &str) -> Option<f64>;

    fn get_bytes(&self, key: &str) -> Option<Vec<u8>>;

    fn get_dict(&self, key: &str) -> Option<Dict>;
}

macro_rules! forward_getter {
    ($($ptr:ty),*) => {$(
        impl<T: PreferenceGetter + ?Sized> PreferenceGetter for $ptr {
            fn get_bool(&self, key: &str) -> Option<bool> {
                (**self).get_bool(key)
            }

            fn get_int(&self, key: &str) -> Option<i64> {
                (**self).get_int(key)
            }

            fn get_double(&self, key: &str) -> Option<f64> {
                (**self).get_double(key)
            }

            fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
                (**self).get_bytes(key)
            }

            fn get_dict(&self, key: &str) -> Option<Dict> {
                (**self).get_dict(key)
            }
        }
    )*};
}

forward_getter!(&T, Box<T>, Arc<T>);
