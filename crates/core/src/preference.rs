// Combined read/write contract

use crate::getter::PreferenceGetter;
use crate::setter::PreferenceSetter;

/// Everything that can both read and write typed preferences.
///
/// Implemented automatically for any type implementing both halves, so
/// application code can depend on `&dyn Preference` or `impl Preference`
/// without naming a backend.
pub trait Preference: PreferenceGetter + PreferenceSetter {}

impl<T: PreferenceGetter + PreferenceSetter + ?Sized> Preference for T {}
