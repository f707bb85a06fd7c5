//! Flow orchestrators for the OAuth 1.0a and 2.0 handshakes.
//!
//! Each flow binds the injected collaborators together: the provider
//! configuration supplies endpoints and quirks, the signature engine signs
//! OAuth1 requests, the transport executes exactly one blocking call per
//! operation, and the token store keeps the canonical current token per
//! provider. Flows hold no handshake state of their own; state is
//! reconstructed from the store, so a process restart resumes cleanly.

pub mod common;
pub mod oauth1;
pub mod oauth2;

pub use common::{
	parse_form_pairs, parse_oauth1_access_token, parse_oauth1_request_token, parse_oauth2_token,
	parse_oauth2_token_at,
};
pub use oauth1::*;
pub use oauth2::*;
