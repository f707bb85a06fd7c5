//! Simple file-backed [`TokenStore`] for lightweight deployments and bots.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{ProviderKey, Token},
	store::{StoreError, TokenStore},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
	tokens: HashMap<ProviderKey, Token>,
	states: HashMap<ProviderKey, String>,
}

/// Persists tokens to a JSON file after each mutation.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: RwLock<Snapshot>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { Snapshot::default() };

		Ok(Self { path, inner: RwLock::new(snapshot) })
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Snapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &Snapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn save(&self, key: &ProviderKey, token: Token) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		guard.tokens.insert(key.clone(), token);
		self.persist_locked(&guard)
	}

	fn fetch(&self, key: &ProviderKey) -> Result<Option<Token>, StoreError> {
		Ok(self.inner.read().tokens.get(key).cloned())
	}

	fn has(&self, key: &ProviderKey) -> Result<bool, StoreError> {
		Ok(self.inner.read().tokens.contains_key(key))
	}

	fn clear(&self, key: &ProviderKey) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		guard.tokens.remove(key);
		self.persist_locked(&guard)
	}

	fn save_state(&self, key: &ProviderKey, state: &str) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		guard.states.insert(key.clone(), state.to_owned());
		self.persist_locked(&guard)
	}

	fn fetch_state(&self, key: &ProviderKey) -> Result<Option<String>, StoreError> {
		Ok(self.inner.read().states.get(key).cloned())
	}

	fn clear_state(&self, key: &ProviderKey) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		guard.states.remove(key);
		self.persist_locked(&guard)
	}
}
