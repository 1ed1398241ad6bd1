//! OAuth 2.0 password-grant wire format: request encoding, response parsing, and transport
//! error classification.

pub use oauth2;

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, CONTENT_TYPE, HeaderValue},
	},
};
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	auth::{TokenResponse, TokenSet, UpstreamRejection},
	config::ExchangeConfig,
	error::{ConfigError, TimeoutError, TransportError},
};

/// RFC 6749 identifier of the resource owner password credentials grant.
pub const PASSWORD_GRANT: &str = "password";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	///
	/// `timeout` is the limit the request ran under, so mappers can surface elapsed
	/// timeouts as [`TimeoutError`] instead of a generic transport failure.
	fn map_transport_error(
		&self,
		timeout: Option<StdDuration>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		timeout: Option<StdDuration>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(timeout, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { message }.into(),
			_ => TransportError::Other { message: "unrecognized transport failure".into() }.into(),
		}
	}
}

/// Builds the form-encoded password-grant request for `config`.
///
/// The body always carries `grant_type`, `client_id`, `client_secret`, `username`,
/// `password`, and `scope`, in that order.
pub fn password_grant_request(config: &ExchangeConfig) -> Result<HttpRequest> {
	let body = FormSerializer::new(String::new())
		.append_pair("grant_type", PASSWORD_GRANT)
		.append_pair("client_id", &config.client_id)
		.append_pair("client_secret", config.client_secret.expose())
		.append_pair("username", &config.username)
		.append_pair("password", config.password.expose())
		.append_pair("scope", &config.scope.normalized())
		.finish();
	let request = oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(config.token_endpoint.as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
		.header(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE))
		.body(body.into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Classifies a token endpoint response.
///
/// Success statuses must carry a token document; error statuses must carry a JSON body,
/// which is handed back untouched. Anything else is a [`TransportError::MalformedBody`].
pub fn parse_token_response(response: HttpResponse) -> Result<TokenResponse> {
	let status = response.status();
	let body = response.body();

	if status.is_success() {
		let tokens: TokenSet = parse_json(body, status.as_u16())?;

		Ok(TokenResponse::Granted(tokens))
	} else {
		let body: JsonValue = parse_json(body, status.as_u16())?;

		Ok(TokenResponse::Rejected(UpstreamRejection { status: status.as_u16(), body }))
	}
}

fn parse_json<T>(body: &[u8], status: u16) -> Result<T>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransportError::MalformedBody { source, status }.into())
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(timeout: Option<StdDuration>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TimeoutError::new(timeout, Some(Box::new(err))).into();
	}

	TransportError::from(err).into()
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::{Response, StatusCode};
	use serde_json::json;
	// self
	use super::*;
	use crate::auth::{ScopeSet, Secret};

	fn config() -> ExchangeConfig {
		ExchangeConfig::builder()
			.client_id("client id")
			.client_secret("s&cret")
			.username("alice@example.com")
			.password("p=ss word")
			.token_endpoint("https://auth.example.com/oauth2/token")
			.scope(ScopeSet::new(["openid", "email"]).expect("Scopes should be valid."))
			.build()
			.expect("Config should build.")
	}

	fn response(status: StatusCode, body: &str) -> HttpResponse {
		let mut response = Response::new(body.as_bytes().to_vec());

		*response.status_mut() = status;

		response
	}

	#[test]
	fn request_is_form_encoded_post() {
		let request = password_grant_request(&config()).expect("Request should build.");

		assert_eq!(request.method(), &Method::POST);
		assert_eq!(request.uri(), "https://auth.example.com/oauth2/token");
		assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
		assert_eq!(request.headers()[ACCEPT], JSON_CONTENT_TYPE);
		assert_eq!(
			String::from_utf8(request.body().clone()).expect("Form body should be UTF-8."),
			"grant_type=password&client_id=client+id&client_secret=s%26cret\
			 &username=alice%40example.com&password=p%3Dss+word&scope=email+openid"
		);
	}

	#[test]
	fn success_parses_token_set() {
		let parsed = parse_token_response(response(
			StatusCode::OK,
			r#"{"access_token":"T","token_type":"bearer","expires_in":3600}"#,
		))
		.expect("Token document should parse.");
		let tokens = parsed.token_set().expect("2xx responses are grants.");

		assert_eq!(tokens.access_token, Some(Secret::new("T")));
		assert_eq!(tokens.token_type.as_deref(), Some("bearer"));
		assert_eq!(tokens.expires_in, Some(3600));
		assert_eq!(tokens.refresh_token, None);
	}

	#[test]
	fn error_status_is_returned_as_data() {
		let parsed = parse_token_response(response(
			StatusCode::BAD_REQUEST,
			r#"{"error":"invalid_grant","error_description":"Incorrect username or password."}"#,
		))
		.expect("Rejections are not errors.");
		let rejection = parsed.rejection().expect("4xx responses are rejections.");

		assert_eq!(rejection.status, 400);
		assert_eq!(
			rejection.body,
			json!({ "error": "invalid_grant", "error_description": "Incorrect username or password." })
		);
	}

	#[test]
	fn unparseable_bodies_are_transport_errors() {
		let err = parse_token_response(response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"))
			.expect_err("HTML bodies cannot be parsed.");

		assert!(matches!(err, Error::Transport(TransportError::MalformedBody { status: 502, .. })));

		let err = parse_token_response(response(StatusCode::OK, r#"{"expires_in":"soon"}"#))
			.expect_err("Wrongly typed members cannot be parsed.");

		match err {
			Error::Transport(TransportError::MalformedBody { source, status }) => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "expires_in");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
