//! Normalized user identity derived from authorizer claims.

// self
use crate::{_prelude::*, auth::AuthorizerClaims};

/// Identity attributes extracted from upstream claims for a single request.
///
/// Missing claim fields stay `None`; the [`subject`](Self::subject) and
/// [`username`](Self::username) accessors substitute [`UserIdentity::UNKNOWN`] at read time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
	/// Stable subject identifier.
	pub subject: Option<String>,
	/// Display or login name.
	pub username: Option<String>,
	/// Group memberships.
	pub groups: BTreeSet<String>,
}
impl UserIdentity {
	/// Placeholder returned for identity fields that are not known.
	pub const UNKNOWN: &'static str = "unknown";

	/// Builds an identity from present, non-empty claims.
	///
	/// Returns `None` for empty claims so absence stays distinguishable from a partially
	/// populated identity.
	pub fn from_claims(claims: &AuthorizerClaims) -> Option<Self> {
		if claims.is_empty() {
			return None;
		}

		Some(Self {
			subject: claims.subject(),
			username: claims.username(),
			groups: claims.groups(),
		})
	}

	/// Identity used by readers when a request carried no claims.
	pub fn fallback() -> Self {
		Self {
			subject: Some(Self::UNKNOWN.into()),
			username: Some(Self::UNKNOWN.into()),
			groups: BTreeSet::new(),
		}
	}

	/// Subject identifier or [`UserIdentity::UNKNOWN`].
	pub fn subject(&self) -> &str {
		self.subject.as_deref().unwrap_or(Self::UNKNOWN)
	}

	/// Username or [`UserIdentity::UNKNOWN`].
	pub fn username(&self) -> &str {
		self.username.as_deref().unwrap_or(Self::UNKNOWN)
	}

	/// Returns true if the identity belongs to `group`.
	pub fn in_group(&self, group: &str) -> bool {
		self.groups.contains(group)
	}
}
