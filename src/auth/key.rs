//! Strongly typed provider identifier used as the storage key.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const PROVIDER_KEY_MAX_LEN: usize = 128;

/// Error returned when provider key validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProviderKeyError {
	/// The key was empty.
	#[error("Provider key cannot be empty.")]
	Empty,
	/// The key contains whitespace characters.
	#[error("Provider key contains whitespace.")]
	ContainsWhitespace,
	/// The key exceeded the allowed character count.
	#[error("Provider key exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier of a provider configuration; partitions token storage.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderKey(String);
impl ProviderKey {
	/// Creates a new key after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProviderKeyError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ProviderKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProviderKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ProviderKey> for String {
	fn from(value: ProviderKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderKey {
	type Error = ProviderKeyError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for ProviderKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ProviderKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for ProviderKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProviderKey {
	type Err = ProviderKeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), ProviderKeyError> {
	if view.is_empty() {
		return Err(ProviderKeyError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ProviderKeyError::ContainsWhitespace);
	}
	if view.len() > PROVIDER_KEY_MAX_LEN {
		return Err(ProviderKeyError::TooLong { max: PROVIDER_KEY_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keys_validate_on_construction() {
		assert!(ProviderKey::new("twitter").is_ok());
		assert!(ProviderKey::new("").is_err());
		assert!(ProviderKey::new("with space").is_err());
		assert!(ProviderKey::new(" padded").is_err());

		let exact = "a".repeat(PROVIDER_KEY_MAX_LEN);

		ProviderKey::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(PROVIDER_KEY_MAX_LEN + 1);

		assert!(ProviderKey::new(&too_long).is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let key: ProviderKey =
			serde_json::from_str("\"linkedin\"").expect("Key should deserialize successfully.");

		assert_eq!(key.as_ref(), "linkedin");
		assert!(serde_json::from_str::<ProviderKey>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<ProviderKey, u8> = HashMap::from_iter([(
			ProviderKey::new("runkeeper").expect("Key used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("runkeeper"), Some(&7));
	}
}
