// Typed preference contracts
// Providers move untyped values; getters and setters narrow and widen them.

pub mod getter;
pub mod memory;
pub mod preference;
pub mod provider;
pub mod setter;
pub mod value;

pub use getter::PreferenceGetter;
pub use memory::MemoryStore;
pub use preference::Preference;
pub use provider::{GetterProvider, SetterProvider};
pub use setter::PreferenceSetter;
pub use value::{dict_from_json, dict_to_json, Dict, DictValue, Kind, Value};
