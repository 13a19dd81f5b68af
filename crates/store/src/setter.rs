// Provider-backed setter

use std::sync::Arc;

use prefkit_core::{Dict, PreferenceSetter, SetterProvider, Value};

use crate::file_store::{standard, FileStore};

/// [`PreferenceSetter`] over a [`SetterProvider`]. Each write wraps the
/// typed value in its [`Value`] variant and forwards it once.
///
/// `SetterAdapter::default()` writes to the process-wide [`standard`] store.
#[derive(Debug, Clone)]
pub struct SetterAdapter<P = Arc<FileStore>> {
    provider: P,
}

impl<P: SetterProvider> SetterAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl Default for SetterAdapter {
    fn default() -> Self {
        Self::new(standard())
    }
}

impl<P: SetterProvider> PreferenceSetter for SetterAdapter<P> {
    fn set_bool(&self, key: &str, value: bool) {
        self.provider.set(Some(Value::Bool(value)), key);
    }

    fn set_int(&self, key: &str, value: i64) {
        self.provider.set(Some(Value::Int(value)), key);
    }

    fn set_double(&self, key: &str, value: f64) {
        self.provider.set(Some(Value::Double(value)), key);
    }

    fn set_bytes(&self, key: &str, value: Vec<u8>) {
        self.provider.set(Some(Value::Bytes(value)), key);
    }

    fn set_dict(&self, key: &str, value: Dict) {
        self.provider.set(Some(Value::Dict(value)), key);
    }

    fn remove(&self, key: &str) {
        self.provider.set(None, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefkit_core::DictValue;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ProviderDouble {
        spies: Mutex<Vec<(Option<Value>, String)>>,
    }

    impl ProviderDouble {
        fn spies(&self) -> Vec<(Option<Value>, String)> {
            self.spies.lock().unwrap().clone()
        }
    }

    impl SetterProvider for ProviderDouble {
        fn set(&self, value: Option<Value>, key: &str) {
            self.spies.lock().unwrap().push((value, key.to_string()));
        }
    }

    fn sut() -> SetterAdapter<ProviderDouble> {
        SetterAdapter::new(ProviderDouble::default())
    }

    #[test]
    fn test_set_bool() {
        let setter = sut();
        setter.set_bool("any", true);
        setter.set_bool("any-other", false);

        assert_eq!(
            setter.provider().spies(),
            vec![
                (Some(Value::Bool(true)), "any".to_string()),
                (Some(Value::Bool(false)), "any-other".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_int() {
        let setter = sut();
        setter.set_int("any", 10);
        assert_eq!(setter.provider().spies(), vec![(Some(Value::Int(10)), "any".to_string())]);
    }

    #[test]
    fn test_set_double_keeps_kind() {
        let setter = sut();
        setter.set_double("any", 10.0);
        assert_eq!(
            setter.provider().spies(),
            vec![(Some(Value::Double(10.0)), "any".to_string())]
        );
    }

    #[test]
    fn test_set_bytes() {
        let setter = sut();
        setter.set_bytes("any", b"payload".to_vec());
        assert_eq!(
            setter.provider().spies(),
            vec![(Some(Value::Bytes(b"payload".to_vec())), "any".to_string())]
        );
    }

    #[test]
    fn test_set_dict() {
        let mut dict = Dict::new();
        dict.insert("theme".into(), DictValue::from("dark"));
        dict.insert("fontSize".into(), DictValue::from(14i64));

        let setter = sut();
        setter.set_dict("user.settings", dict.clone());
        assert_eq!(
            setter.provider().spies(),
            vec![(Some(Value::Dict(dict)), "user.settings".to_string())]
        );
    }

    #[test]
    fn test_remove_forwards_absent_value() {
        let setter = sut();
        setter.remove("any");
        assert_eq!(setter.provider().spies(), vec![(None, "any".to_string())]);
    }
}
