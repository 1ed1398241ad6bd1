//! Cross-origin resource sharing policy applied to every gateway response.

// crates.io
use oauth2::http::{
	HeaderMap, HeaderValue, StatusCode,
	header::{
		ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
		ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, VARY,
	},
};
// self
use crate::gateway::GatewayResponse;

/// CORS headers emitted by the gateway.
///
/// The default mirrors a permissive API Gateway setup: any origin, the common REST verbs,
/// and the headers AWS SigV4 and API keys rely on.
#[derive(Clone, Debug)]
pub struct CorsPolicy {
	/// `Access-Control-Allow-Origin` value.
	pub allow_origin: HeaderValue,
	/// `Access-Control-Allow-Methods` value sent on preflight responses.
	pub allow_methods: HeaderValue,
	/// `Access-Control-Allow-Headers` value sent on preflight responses.
	pub allow_headers: HeaderValue,
	/// Whether `Access-Control-Allow-Credentials: true` is sent.
	pub allow_credentials: bool,
	/// Status returned for preflight requests.
	pub preflight_status: StatusCode,
}
impl CorsPolicy {
	/// Overrides the allowed origin.
	pub fn with_origin(mut self, origin: HeaderValue) -> Self {
		self.allow_origin = origin;

		self
	}

	/// Overrides the allowed request headers.
	pub fn with_allowed_headers(mut self, headers: HeaderValue) -> Self {
		self.allow_headers = headers;

		self
	}

	/// Adds the headers every response carries.
	pub fn apply(&self, headers: &mut HeaderMap) {
		headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());

		if self.allow_origin != "*" {
			headers.append(VARY, HeaderValue::from_static("Origin"));
		}
		if self.allow_credentials {
			headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
		}
	}

	/// Answers a preflight request without forwarding it to a route.
	pub fn preflight(&self) -> GatewayResponse {
		let mut response = GatewayResponse::new(Vec::new());

		*response.status_mut() = self.preflight_status;

		let headers = response.headers_mut();

		self.apply(headers);
		headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
		headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
		headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));

		response
	}
}
impl Default for CorsPolicy {
	fn default() -> Self {
		Self {
			allow_origin: HeaderValue::from_static("*"),
			allow_methods: HeaderValue::from_static("GET,HEAD,PUT,PATCH,POST,DELETE,OPTIONS"),
			allow_headers: HeaderValue::from_static(
				"Content-Type,Accept,Authorization,X-Amz-Date,X-Api-Key,X-Amz-Security-Token",
			),
			allow_credentials: true,
			preflight_status: StatusCode::NO_CONTENT,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn preflight_carries_full_policy() {
		let response = CorsPolicy::default().preflight();
		let headers = response.headers();

		assert_eq!(response.status(), StatusCode::NO_CONTENT);
		assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
		assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
		assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET,HEAD,PUT,PATCH,POST,DELETE,OPTIONS");
		assert!(
			headers[ACCESS_CONTROL_ALLOW_HEADERS]
				.to_str()
				.expect("Header should be ASCII.")
				.contains("X-Amz-Security-Token")
		);
		assert!(response.body().is_empty());
	}

	#[test]
	fn specific_origins_vary_on_origin() {
		let policy =
			CorsPolicy::default().with_origin(HeaderValue::from_static("https://app.example.com"));
		let mut headers = HeaderMap::new();

		policy.apply(&mut headers);

		assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.example.com");
		assert_eq!(headers[VARY], "Origin");
		assert!(!headers.contains_key(ACCESS_CONTROL_ALLOW_METHODS));
	}
}
