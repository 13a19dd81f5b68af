// Provider-backed getter
// Narrows raw provider values to the requested kind.

use std::sync::Arc;

use prefkit_core::{Dict, GetterProvider, PreferenceGetter};

use crate::file_store::{standard, FileStore};

/// [`PreferenceGetter`] over a [`GetterProvider`].
///
/// Each read calls the provider once and keeps the result only if its kind
/// matches exactly: a stored int never satisfies `get_double`, and a stored
/// double never satisfies `get_int`.
///
/// `GetterAdapter::default()` reads from the process-wide [`standard`] store.
#[derive(Debug, Clone)]
pub struct GetterAdapter<P = Arc<FileStore>> {
    provider: P,
}

impl<P: GetterProvider> GetterAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl Default for GetterAdapter {
    fn default() -> Self {
        Self::new(standard())
    }
}

impl<P: GetterProvider> PreferenceGetter for GetterAdapter<P> {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.provider.value(key)?.as_bool()
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.provider.value(key)?.as_int()
    }

    fn get_double(&self, key: &str) -> Option<f64> {
        self.provider.value(key)?.as_double()
    }

    fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.provider.value(key)?.into_bytes()
    }

    fn get_dict(&self, key: &str) -> Option<Dict> {
        self.provider.value(key)?.into_dict()
    }
}
