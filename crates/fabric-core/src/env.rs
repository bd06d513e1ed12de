//! Environment variable lookup.
//!
//! Interpolation never touches the process environment directly. It asks an
//! [`EnvLookup`] instead, so tests and embedders can supply their own table.

use std::collections::{BTreeMap, HashMap};

/// Read-only lookup of environment variables by name.
pub trait EnvLookup {
    /// Get the value of `name`, or `None` if it is not set.
    ///
    /// A variable set to the empty string is `Some("")`, not `None`.
    fn get(&self, name: &str) -> Option<String>;
}

/// Lookup backed by the process environment.
///
/// Variables whose value is not valid Unicode are reported as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}
