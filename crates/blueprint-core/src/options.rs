//! Host key/value option store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// The host's key/value configuration store.
///
/// Content model and taxonomy definitions are persisted here. Every component
/// that needs it receives it explicitly, so tests can hand in a
/// [`MemorySite`](crate::memory::MemorySite).
pub trait OptionRepository: Send + Sync {
	/// Reads an option.
	fn get_option(&self, key: &str) -> CoreResult<Option<Value>>;

	/// Creates or replaces an option.
	fn set_option(&self, key: &str, value: Value) -> CoreResult<()>;

	/// Removes an option, returning whether it existed.
	fn delete_option(&self, key: &str) -> CoreResult<bool>;
}

/// Reads an option and deserializes it.
pub fn get_typed<T: DeserializeOwned>(repo: &dyn OptionRepository, key: &str) -> CoreResult<Option<T>> {
	match repo.get_option(key)? {
		Some(value) => serde_json::from_value(value)
			.map(Some)
			.map_err(|e| CoreError::InvalidOption {
				key: key.to_string(),
				message: e.to_string(),
			}),
		None => Ok(None),
	}
}

/// Serializes a value and stores it as an option.
pub fn set_typed<T: Serialize>(repo: &dyn OptionRepository, key: &str, value: &T) -> CoreResult<()> {
	repo.set_option(key, serde_json::to_value(value)?)
}
