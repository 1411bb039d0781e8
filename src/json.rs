//! JSON factory shared by the service's HTTP surfaces.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::JsonConfig;

/// Encodes and decodes JSON with service-wide settings.
///
/// Cheap to clone; handed to every component that renders JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonFactory {
    pretty: bool,
    omit_nulls: bool,
}

impl JsonFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &JsonConfig) -> Self {
        Self {
            pretty: config.pretty,
            omit_nulls: config.omit_nulls,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn omit_nulls(mut self, omit_nulls: bool) -> Self {
        self.omit_nulls = omit_nulls;
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn omits_nulls(&self) -> bool {
        self.omit_nulls
    }

    /// Encode `value` as a JSON string.
    pub fn to_string<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        let mut tree = serde_json::to_value(value)?;
        if self.omit_nulls {
            strip_nulls(&mut tree);
        }
        if self.pretty {
            serde_json::to_string_pretty(&tree)
        } else {
            serde_json::to_string(&tree)
        }
    }

    pub fn to_vec<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        self.to_string(value).map(String::into_bytes)
    }

    pub fn from_slice<T: DeserializeOwned>(&self, bytes: &[u8]) -> serde_json::Result<T> {
        serde_json::from_slice(bytes)
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
