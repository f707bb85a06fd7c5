//! Storage contracts and built-in store implementations for issued tokens.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::{ProviderKey, Token}};

/// Persistence contract for engine-issued tokens, keyed by provider.
///
/// The store, not the flow, owns the canonical "current" token per provider;
/// flows only propose new tokens after a successful exchange. Implementations
/// shared across concurrent callers must provide their own concurrency safety.
/// Durability across process restarts is an implementation property, never an
/// engine assumption.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the token for the provider.
	fn save(&self, key: &ProviderKey, token: Token) -> Result<(), StoreError>;

	/// Fetches the token associated with the provider, if present.
	fn fetch(&self, key: &ProviderKey) -> Result<Option<Token>, StoreError>;

	/// Returns `true` when a token is stored for the provider.
	fn has(&self, key: &ProviderKey) -> Result<bool, StoreError>;

	/// Removes the stored token for the provider.
	fn clear(&self, key: &ProviderKey) -> Result<(), StoreError>;

	/// Persists the pending authorization `state` value for the provider.
	fn save_state(&self, key: &ProviderKey, state: &str) -> Result<(), StoreError>;

	/// Fetches the pending authorization state, if present.
	fn fetch_state(&self, key: &ProviderKey) -> Result<Option<String>, StoreError>;

	/// Removes the pending authorization state for the provider.
	fn clear_state(&self, key: &ProviderKey) -> Result<(), StoreError>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// No token is stored for the provider.
	#[error("No token is stored for provider `{provider}`.")]
	Missing {
		/// Provider identifier string.
		provider: String,
	},
}
