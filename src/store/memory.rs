//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ProviderKey, Token},
	store::{StoreError, TokenStore},
};

#[derive(Debug, Default)]
struct MemoryState {
	tokens: HashMap<ProviderKey, Token>,
	states: HashMap<ProviderKey, String>,
}

/// Thread-safe storage backend that keeps tokens in-process for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore(RwLock<MemoryState>);
impl TokenStore for MemoryStore {
	fn save(&self, key: &ProviderKey, token: Token) -> Result<(), StoreError> {
		self.0.write().tokens.insert(key.clone(), token);

		Ok(())
	}

	fn fetch(&self, key: &ProviderKey) -> Result<Option<Token>, StoreError> {
		Ok(self.0.read().tokens.get(key).cloned())
	}

	fn has(&self, key: &ProviderKey) -> Result<bool, StoreError> {
		Ok(self.0.read().tokens.contains_key(key))
	}

	fn clear(&self, key: &ProviderKey) -> Result<(), StoreError> {
		self.0.write().tokens.remove(key);

		Ok(())
	}

	fn save_state(&self, key: &ProviderKey, state: &str) -> Result<(), StoreError> {
		self.0.write().states.insert(key.clone(), state.to_owned());

		Ok(())
	}

	fn fetch_state(&self, key: &ProviderKey) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().states.get(key).cloned())
	}

	fn clear_state(&self, key: &ProviderKey) -> Result<(), StoreError> {
		self.0.write().states.remove(key);

		Ok(())
	}
}
