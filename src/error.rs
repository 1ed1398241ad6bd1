//! Crate-level error types shared by the exchange client, configuration, and gateway layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Upstream OAuth rejections are not errors; they come back as
/// [`TokenResponse::Rejected`](crate::auth::TokenResponse::Rejected).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, unreadable response body).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The configured request timeout elapsed.
	#[error(transparent)]
	Timeout(#[from] TimeoutError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A required configuration value was not supplied.
	#[error("Configuration value `{field}` is missing.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
	},
	/// A configuration value that must carry content was empty.
	#[error("Configuration value `{field}` cannot be empty.")]
	EmptyField {
		/// Name of the empty field.
		field: &'static str,
	},
	/// Token endpoint is not a parseable absolute URL.
	#[error("Token endpoint is not a valid absolute URL.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint uses a scheme other than `http` or `https`.
	#[error("Token endpoint must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Scheme that failed validation.
		scheme: String,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Stage prefix is not a single leading path segment.
	#[error("Stage prefix `{prefix}` must start with `/`, name a segment, and not end with `/`.")]
	InvalidStagePrefix {
		/// Prefix that failed validation.
		prefix: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, unreadable bodies).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// Token endpoint responded with a body that is not the expected JSON document.
	#[error("Token endpoint returned a malformed body (HTTP {status}).")]
	MalformedBody {
		/// Structured parsing failure, including the JSON path that failed.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Transport reported a failure without a structured cause.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Raised when the token endpoint does not answer before a deadline elapses.
#[derive(Debug, ThisError)]
#[error("Token endpoint did not respond {}.", describe_limit(.timeout))]
pub struct TimeoutError {
	/// Per-exchange limit that elapsed; `None` when a transport-level deadline fired instead.
	pub timeout: Option<StdDuration>,
	/// Transport-specific cause, when the transport reported one.
	#[source]
	pub source: Option<BoxError>,
}
impl TimeoutError {
	/// Builds a timeout error for the exchange's `timeout` with an optional transport cause.
	pub fn new(timeout: Option<StdDuration>, source: Option<BoxError>) -> Self {
		Self { timeout, source }
	}
}

fn describe_limit(timeout: &Option<StdDuration>) -> String {
	match timeout {
		Some(limit) => format!("within {limit:?}"),
		None => "before the transport deadline".into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn config_errors_render_field_names() {
		let err = Error::from(ConfigError::EmptyField { field: "username" });

		assert_eq!(err.to_string(), "Configuration value `username` cannot be empty.");
	}

	#[test]
	fn timeout_is_distinct_from_transport() {
		let err = Error::from(TimeoutError::new(Some(StdDuration::from_secs(2)), None));

		assert!(matches!(err, Error::Timeout(_)));
		assert_eq!(err.to_string(), "Token endpoint did not respond within 2s.");
	}

	#[test]
	fn transport_deadlines_do_not_claim_a_limit() {
		let err = TimeoutError::new(None, None);

		assert_eq!(err.timeout, None);
		assert_eq!(err.to_string(), "Token endpoint did not respond before the transport deadline.");
	}
}
