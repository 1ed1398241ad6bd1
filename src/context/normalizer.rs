//! Per-request path and identity normalization.

// crates.io
use oauth2::http::Request as HttpRequest;
// self
use crate::{
	_prelude::*,
	auth::{AuthorizerClaims, UserIdentity},
	context::StagePrefixes,
	error::ConfigError,
	obs,
};

/// Request attributes the normalizer reads.
#[derive(Clone, Copy, Debug)]
pub struct InboundRequest<'a> {
	/// Request path as received, including any stage prefix.
	pub path: &'a str,
	/// Claims attached by the upstream authorizer, if any.
	pub claims: Option<&'a AuthorizerClaims>,
}
impl<'a> InboundRequest<'a> {
	/// Describes a request without authorizer claims.
	pub fn new(path: &'a str) -> Self {
		Self { path, claims: None }
	}

	/// Attaches authorizer claims.
	pub fn with_claims(mut self, claims: &'a AuthorizerClaims) -> Self {
		self.claims = Some(claims);

		self
	}
}

/// Normalized view of a single inbound request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
	/// Original request path, including any stage prefix.
	pub raw_path: String,
	/// Path with the recognized stage prefix removed; empty when the path was only a stage.
	pub normalized_path: String,
	/// Stage prefix that was stripped, if any.
	pub stage: Option<String>,
	/// Identity derived from authorizer claims; `None` when no claims were supplied.
	pub identity: Option<UserIdentity>,
}
impl RequestContext {
	/// Path used for routing; an empty normalized path routes as `/`.
	pub fn route_path(&self) -> &str {
		if self.normalized_path.is_empty() { "/" } else { &self.normalized_path }
	}

	/// Identity for downstream readers, substituting [`UserIdentity::fallback`] when absent.
	///
	/// The stored [`identity`](Self::identity) is left untouched.
	pub fn user(&self) -> Cow<'_, UserIdentity> {
		match &self.identity {
			Some(identity) => Cow::Borrowed(identity),
			None => Cow::Owned(UserIdentity::fallback()),
		}
	}
}

/// Derives [`RequestContext`] values from inbound requests.
///
/// Normalization is pure: the normalizer holds only its immutable prefix list, so one
/// instance can serve every request concurrently.
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
	prefixes: StagePrefixes,
}
impl Normalizer {
	/// Creates a normalizer recognizing `/prod`, `/dev`, and `/staging`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a normalizer recognizing a custom ordered list of stage prefixes.
	pub fn with_stages<I, S>(prefixes: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Ok(Self { prefixes: StagePrefixes::new(prefixes)? })
	}

	/// Prefixes recognized by this normalizer.
	pub fn prefixes(&self) -> &StagePrefixes {
		&self.prefixes
	}

	/// Returns the application-relative form of `path`.
	pub fn normalize_path<'p>(&self, path: &'p str) -> &'p str {
		self.prefixes.strip(path).1
	}

	/// Builds the request context for `request`. Never fails.
	pub fn normalize(&self, request: InboundRequest<'_>) -> RequestContext {
		let (stage, normalized) = self.prefixes.strip(request.path);
		let identity = request.claims.and_then(UserIdentity::from_claims);
		let context = RequestContext {
			raw_path: request.path.to_owned(),
			normalized_path: normalized.to_owned(),
			stage: stage.map(str::to_owned),
			identity,
		};

		obs::record_normalized(&context, request.claims);

		context
	}

	/// Middleware form: normalizes `request` and stores the context in its extensions.
	///
	/// Claims are read from an [`AuthorizerClaims`] extension placed there by the gateway
	/// adapter. A context already present from an earlier pass is replaced.
	pub fn attach<B>(&self, request: &mut HttpRequest<B>) -> RequestContext {
		let context = {
			let inbound = InboundRequest {
				path: request.uri().path(),
				claims: request.extensions().get::<AuthorizerClaims>(),
			};

			self.normalize(inbound)
		};

		request.extensions_mut().insert(context.clone());

		context
	}
}

/// Normalizes `request` with the built-in stage prefixes.
pub fn normalize(request: InboundRequest<'_>) -> RequestContext {
	Normalizer::default().normalize(request)
}
