//! Token endpoint response models.

// self
use crate::{_prelude::*, auth::Secret};

/// Tokens and metadata returned by a successful grant.
///
/// Every member is optional because providers differ in what the password grant returns
/// (an `id_token` only with `openid`, a `refresh_token` only when offline access is enabled,
/// and so on). Members the model does not name are kept verbatim in [`TokenSet::extra`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
	/// Access token secret; callers must avoid logging it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<Secret>,
	/// OpenID Connect ID token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_token: Option<Secret>,
	/// Refresh token secret.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<Secret>,
	/// Access token lifetime in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<u64>,
	/// Token type (usually `Bearer`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Space-delimited scope string, when the provider echoes it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Response members not modeled above.
	#[serde(flatten)]
	pub extra: BTreeMap<String, JsonValue>,
}
impl TokenSet {
	/// Access token lifetime as a [`Duration`].
	pub fn lifetime(&self) -> Option<Duration> {
		self.expires_in.and_then(|secs| i64::try_from(secs).ok()).map(Duration::seconds)
	}

	/// Expiry instant relative to `issued_at`, if the response carried `expires_in`.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> Option<OffsetDateTime> {
		self.lifetime().and_then(|lifetime| issued_at.checked_add(lifetime))
	}
}

/// Non-success response from the token endpoint, returned as data.
///
/// The body is kept exactly as the provider sent it; OAuth error codes are exposed for
/// inspection but never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRejection {
	/// HTTP status code of the response.
	pub status: u16,
	/// JSON body as returned by the provider.
	pub body: JsonValue,
}
impl UpstreamRejection {
	/// OAuth `error` member, when present.
	pub fn error(&self) -> Option<&str> {
		self.body.get("error").and_then(JsonValue::as_str)
	}

	/// OAuth `error_description` member, when present.
	pub fn error_description(&self) -> Option<&str> {
		self.body.get("error_description").and_then(JsonValue::as_str)
	}
}

/// Outcome of a token request that reached the provider.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenResponse {
	/// The provider answered with a success status and a token document.
	Granted(TokenSet),
	/// The provider answered with an error status.
	Rejected(UpstreamRejection),
}
impl TokenResponse {
	/// Returns the token set when the grant succeeded.
	pub fn token_set(&self) -> Option<&TokenSet> {
		match self {
			Self::Granted(tokens) => Some(tokens),
			Self::Rejected(_) => None,
		}
	}

	/// Returns the rejection when the provider refused the grant.
	pub fn rejection(&self) -> Option<&UpstreamRejection> {
		match self {
			Self::Granted(_) => None,
			Self::Rejected(rejection) => Some(rejection),
		}
	}

	/// Converts into the token set, handing back the rejection otherwise.
	pub fn into_token_set(self) -> Result<TokenSet, UpstreamRejection> {
		match self {
			Self::Granted(tokens) => Ok(tokens),
			Self::Rejected(rejection) => Err(rejection),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn token_set_keeps_unknown_members() {
		let tokens: TokenSet = serde_json::from_value(json!({
			"access_token": "T",
			"token_type": "bearer",
			"expires_in": 3600,
			"session_state": "abc",
		}))
		.expect("Token document should deserialize.");

		assert_eq!(tokens.access_token.as_ref().map(Secret::expose), Some("T"));
		assert_eq!(tokens.id_token, None);
		assert_eq!(tokens.extra.get("session_state"), Some(&json!("abc")));
		assert_eq!(
			tokens.expires_at(datetime!(2024-01-01 00:00 UTC)),
			Some(datetime!(2024-01-01 01:00 UTC))
		);
	}

	#[test]
	fn rejection_exposes_oauth_fields_verbatim() {
		let rejection = UpstreamRejection {
			status: 400,
			body: json!({ "error": "invalid_grant", "error_description": "Incorrect username." }),
		};
		let response = TokenResponse::Rejected(rejection.clone());

		assert_eq!(rejection.error(), Some("invalid_grant"));
		assert_eq!(rejection.error_description(), Some("Incorrect username."));
		assert!(response.token_set().is_none());
		assert_eq!(response.into_token_set(), Err(rejection));
	}
}
