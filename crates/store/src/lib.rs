// Preferences backed by a per-domain JSON file
// Adapters bind the typed contracts from prefkit-core to a provider.

pub mod config;
pub mod error;
pub mod file_store;
pub mod getter;
pub mod preference_store;
pub mod setter;

pub use config::StoreConfig;
pub use error::StoreError;
pub use file_store::{standard, FileStore};
pub use getter::GetterAdapter;
pub use preference_store::{PreferenceStore, PreferenceStoreBuilder, SharedGetter, SharedSetter};
pub use setter::SetterAdapter;

pub use prefkit_core::{
    dict_from_json, dict_to_json, Dict, DictValue, GetterProvider, Kind, MemoryStore, Preference,
    PreferenceGetter, PreferenceSetter, SetterProvider, Value,
};
