//! Upstream authorizer claims and their tolerant field accessors.
//!
//! Claims arrive as an untyped JSON object that an API gateway attached after verifying the
//! caller's token. Nothing here re-verifies them; the accessors only read the fields the
//! request context needs and degrade to "missing" when a field is absent or has an unexpected
//! shape.

// self
use crate::_prelude::*;

/// Subject claim key.
pub const SUBJECT_CLAIM: &str = "sub";
/// Primary username claim key.
pub const USERNAME_CLAIM: &str = "username";
/// Username claim key used by Cognito ID tokens.
pub const COGNITO_USERNAME_CLAIM: &str = "cognito:username";
/// Group membership claim key.
pub const GROUPS_CLAIM: &str = "cognito:groups";

/// Non-fatal diagnostic describing claims that lack expected fields.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Authorizer claims are missing expected fields: {}.", missing.join(", "))]
pub struct MalformedClaims {
	/// Claim keys that were absent or unusable.
	pub missing: Vec<&'static str>,
}

/// Claims object supplied by an upstream authorizer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizerClaims(JsonMap<String, JsonValue>);
impl AuthorizerClaims {
	/// Wraps an existing JSON object.
	pub fn new(claims: JsonMap<String, JsonValue>) -> Self {
		Self(claims)
	}

	/// Wraps `value` when it is a JSON object; any other shape yields `None`.
	pub fn from_value(value: JsonValue) -> Option<Self> {
		match value {
			JsonValue::Object(map) => Some(Self(map)),
			_ => None,
		}
	}

	/// Returns true when the authorizer supplied no claims at all.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Raw access to a single claim.
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.0.get(key)
	}

	/// Subject identifier, if present as a string or number.
	pub fn subject(&self) -> Option<String> {
		self.get(SUBJECT_CLAIM).and_then(scalar_text)
	}

	/// Login name, preferring `username` over `cognito:username`.
	pub fn username(&self) -> Option<String> {
		self.get(USERNAME_CLAIM)
			.and_then(scalar_text)
			.or_else(|| self.get(COGNITO_USERNAME_CLAIM).and_then(scalar_text))
	}

	/// Group memberships; an absent or unusable field yields an empty set.
	///
	/// Accepts a JSON array of strings as well as the flattened string forms gateways emit
	/// (`"admin,ops"` or `"[admin ops]"`).
	pub fn groups(&self) -> BTreeSet<String> {
		match self.get(GROUPS_CLAIM) {
			Some(JsonValue::Array(values)) =>
				values.iter().filter_map(scalar_text).filter(|group| !group.is_empty()).collect(),
			Some(JsonValue::String(raw)) => split_group_string(raw),
			_ => BTreeSet::new(),
		}
	}

	/// Reports which expected fields are missing; never fails the caller's request.
	pub fn inspect(&self) -> Result<(), MalformedClaims> {
		let mut missing = Vec::new();

		if self.subject().is_none() {
			missing.push(SUBJECT_CLAIM);
		}
		if self.username().is_none() {
			missing.push(USERNAME_CLAIM);
		}

		if missing.is_empty() { Ok(()) } else { Err(MalformedClaims { missing }) }
	}
}
impl From<JsonMap<String, JsonValue>> for AuthorizerClaims {
	fn from(claims: JsonMap<String, JsonValue>) -> Self {
		Self(claims)
	}
}

fn scalar_text(value: &JsonValue) -> Option<String> {
	match value {
		JsonValue::String(text) => Some(text.clone()),
		JsonValue::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

fn split_group_string(raw: &str) -> BTreeSet<String> {
	let trimmed = raw.trim();
	let inner = trimmed
		.strip_prefix('[')
		.and_then(|rest| rest.strip_suffix(']'))
		.unwrap_or(trimmed);

	inner
		.split(|c: char| c == ',' || c.is_whitespace())
		.filter(|group| !group.is_empty())
		.map(str::to_owned)
		.collect()
}
