//! JSON sub-environment.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::EnvironmentError;
use crate::json::JsonFactory;
use crate::validator::Validator;

/// Exposes the service's JSON factory to setup code.
pub struct JsonEnvironment {
    factory: JsonFactory,
}

impl JsonEnvironment {
    pub(crate) fn new(factory: JsonFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &JsonFactory {
        &self.factory
    }

    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, EnvironmentError> {
        self.factory.to_string(value).map_err(EnvironmentError::from)
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, EnvironmentError> {
        self.factory.from_slice(bytes).map_err(EnvironmentError::from)
    }

    /// Decode `bytes`, rejecting documents that `validator` finds fault with.
    pub fn decode_validated<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        validator: &dyn Validator,
    ) -> Result<T, EnvironmentError> {
        let tree: Value = self.factory.from_slice(bytes)?;

        let violations = validator.validate(&tree);
        if !violations.is_empty() {
            return Err(EnvironmentError::Validation(violations));
        }

        serde_json::from_value(tree).map_err(EnvironmentError::from)
    }
}
