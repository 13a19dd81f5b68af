//! Unified preference store.
//!
//! [`PreferenceStore`] is the type applications hold. It composes one
//! getter and one setter, fixed at construction, and forwards every call
//! unchanged to the matching delegate.
//!
//! ```no_run
//! use prefkit_store::{PreferenceGetter, PreferenceSetter, PreferenceStore};
//!
//! let prefs = PreferenceStore::default();
//! prefs.set_bool("feature.enabled", true);
//! if let Some(enabled) = prefs.get_bool("feature.enabled") {
//!     println!("feature enabled: {enabled}");
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use prefkit_core::{Dict, GetterProvider, PreferenceGetter, PreferenceSetter, SetterProvider};

use crate::config::StoreConfig;
use crate::file_store::{standard, FileStore};
use crate::getter::GetterAdapter;
use crate::setter::SetterAdapter;

/// Shared read delegate.
pub type SharedGetter = Arc<dyn PreferenceGetter + Send + Sync>;

/// Shared write delegate.
pub type SharedSetter = Arc<dyn PreferenceSetter + Send + Sync>;

#[derive(Clone)]
pub struct PreferenceStore {
    getter: SharedGetter,
    setter: SharedSetter,
}

impl PreferenceStore {
    /// Compose an explicit getter and setter.
    pub fn new<G, S>(getter: G, setter: S) -> Self
    where
        G: PreferenceGetter + Send + Sync + 'static,
        S: PreferenceSetter + Send + Sync + 'static,
    {
        Self::from_shared(Arc::new(getter), Arc::new(setter))
    }

    /// Compose delegates the caller keeps references to.
    pub fn from_shared(getter: SharedGetter, setter: SharedSetter) -> Self {
        Self { getter, setter }
    }

    /// Bind both adapters to one backing store.
    pub fn with_provider<P>(provider: P) -> Self
    where
        P: GetterProvider + SetterProvider + Clone + Send + Sync + 'static,
    {
        let (getter, setter) = adapters_over(provider);
        Self::from_shared(getter, setter)
    }

    /// Bind both adapters to the file store described by `config`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_provider(Arc::new(FileStore::from_config(config)))
    }

    pub fn builder() -> PreferenceStoreBuilder {
        PreferenceStoreBuilder::default()
    }

    pub fn getter(&self) -> &SharedGetter {
        &self.getter
    }

    pub fn setter(&self) -> &SharedSetter {
        &self.setter
    }
}

impl Default for PreferenceStore {
    /// Adapters over the process-wide [`standard`] store.
    fn default() -> Self {
        Self::new(GetterAdapter::default(), SetterAdapter::default())
    }
}

impl fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

impl PreferenceGetter for PreferenceStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.getter.get_bool(key)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.getter.get_int(key)
    }

    fn get_double(&self, key: &str) -> Option<f64> {
        self.getter.get_double(key)
    }

    fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.getter.get_bytes(key)
    }

    fn get_dict(&self, key: &str) -> Option<Dict> {
        self.getter.get_dict(key)
    }
}

impl PreferenceSetter for PreferenceStore {
    fn set_bool(&self, key: &str, value: bool) {
        self.setter.set_bool(key, value)
    }

    fn set_int(&self, key: &str, value: i64) {
        self.setter.set_int(key, value)
    }

    fn set_double(&self, key: &str, value: f64) {
        self.setter.set_double(key, value)
    }

    fn set_bytes(&self, key: &str, value: Vec<u8>) {
        self.setter.set_bytes(key, value)
    }

    fn set_dict(&self, key: &str, value: Dict) {
        self.setter.set_dict(key, value)
    }

    fn remove(&self, key: &str) {
        self.setter.remove(key)
    }
}

/// Builds a [`PreferenceStore`] from optional overrides.
///
/// Precedence per delegate: explicit `getter`/`setter`, then an adapter over
/// `provider`, then an adapter over the `config` file store, then the
/// [`standard`] store.
#[derive(Default)]
pub struct PreferenceStoreBuilder {
    getter: Option<SharedGetter>,
    setter: Option<SharedSetter>,
    provider: Option<(SharedGetter, SharedSetter)>,
    config: Option<StoreConfig>,
}

impl PreferenceStoreBuilder {
    pub fn getter<G>(mut self, getter: G) -> Self
    where
        G: PreferenceGetter + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn setter<S>(mut self, setter: S) -> Self
    where
        S: PreferenceSetter + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    pub fn provider<P>(mut self, provider: P) -> Self
    where
        P: GetterProvider + SetterProvider + Clone + Send + Sync + 'static,
    {
        self.provider = Some(adapters_over(provider));
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> PreferenceStore {
        let Self {
            getter,
            setter,
            provider,
            config,
        } = self;

        if let (Some(getter), Some(setter)) = (&getter, &setter) {
            // Both delegates supplied: no store is opened.
            return PreferenceStore::from_shared(Arc::clone(getter), Arc::clone(setter));
        }

        let (default_getter, default_setter) = provider.unwrap_or_else(|| {
            let store = match &config {
                Some(config) => Arc::new(FileStore::from_config(config)),
                None => standard(),
            };
            adapters_over(store)
        });

        PreferenceStore::from_shared(
            getter.unwrap_or(default_getter),
            setter.unwrap_or(default_setter),
        )
    }
}

fn adapters_over<P>(provider: P) -> (SharedGetter, SharedSetter)
where
    P: GetterProvider + SetterProvider + Clone + Send + Sync + 'static,
{
    let getter: SharedGetter = Arc::new(GetterAdapter::new(provider.clone()));
    let setter: SharedSetter = Arc::new(SetterAdapter::new(provider));
    (getter, setter)
}
