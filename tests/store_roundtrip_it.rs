// std
use std::{env, fs, process};
// self
use oauth_handshake::{
	auth::{OAuth1Token, OAuth2Token, ProviderKey, Token, TokenLifetime},
	store::{FileStore, MemoryStore, TokenStore},
};
use time::OffsetDateTime;

fn sample_tokens() -> Vec<(ProviderKey, Token)> {
	let oauth1 = OAuth1Token::new(
		"access",
		"access-secret",
		vec![("screen_name".into(), "tester".into())],
	)
	.with_request_token("req", "req-secret");
	let oauth2 = OAuth2Token::new(
		"bearer-access",
		TokenLifetime::ExpiresAt(OffsetDateTime::now_utc() + time::Duration::hours(1)),
		Some("refresh".into()),
		vec![("token_type".into(), "bearer".into())],
	);

	vec![
		(
			ProviderKey::new("twitter").expect("Provider key fixture should be valid."),
			Token::OAuth1(oauth1),
		),
		(
			ProviderKey::new("linkedin").expect("Provider key fixture should be valid."),
			Token::OAuth2(oauth2),
		),
	]
}

#[test]
fn memory_store_round_trips_field_for_field() {
	let store = MemoryStore::default();

	for (key, token) in sample_tokens() {
		store.save(&key, token.clone()).expect("Save should succeed.");

		let fetched = store
			.fetch(&key)
			.expect("Fetch should succeed.")
			.expect("Stored token should be present.");

		assert_eq!(fetched, token, "Round-tripped token must match field for field.");
	}
}

#[test]
fn file_store_round_trips_across_a_reopen() {
	let path = env::temp_dir().join(format!(
		"oauth_handshake_roundtrip_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	));

	{
		let store = FileStore::open(&path).expect("File store should open.");

		for (key, token) in sample_tokens() {
			store.save(&key, token).expect("Save should succeed.");
		}
	}

	let reopened = FileStore::open(&path).expect("File store should reopen.");

	for (key, token) in sample_tokens() {
		let fetched = reopened
			.fetch(&key)
			.expect("Fetch should succeed.")
			.expect("Token should survive the reopen.");

		// The OAuth2 fixture embeds a fresh expiry instant per call, so compare
		// the stable fields instead of the whole value.
		match (fetched, token) {
			(Token::OAuth1(fetched), Token::OAuth1(expected)) => assert_eq!(fetched, expected),
			(Token::OAuth2(fetched), Token::OAuth2(expected)) => {
				assert_eq!(fetched.access_token, expected.access_token);
				assert_eq!(fetched.refresh_token, expected.refresh_token);
				assert_eq!(fetched.extra, expected.extra);
			},
			(fetched, expected) =>
				panic!("Token kind changed across the reopen: {fetched:?} vs {expected:?}."),
		}
	}

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary snapshot {}: {e}", path.display())
	});
}
