//! API Gateway proxy event conversion.
//!
//! API Gateway hands a serverless function a JSON envelope rather than a raw HTTP request.
//! [`ProxyEvent`] turns that envelope into an [`http::Request`](oauth2::http::Request) with the
//! authorizer claims stored as an [`AuthorizerClaims`] extension, and [`ProxyResponse`] turns
//! the gateway's response back into the envelope API Gateway expects.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::http::Request;
use url::Position;
// self
use crate::{
	_prelude::*,
	auth::AuthorizerClaims,
	gateway::{GatewayError, GatewayRequest, GatewayResponse},
};

const URI_BASE: &str = "http://localhost/";

/// Inbound API Gateway proxy event (payload format 1.0).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
	/// HTTP method.
	pub http_method: String,
	/// Request path, possibly stage-prefixed.
	pub path: String,
	/// Single-value request headers.
	#[serde(default)]
	pub headers: Option<BTreeMap<String, String>>,
	/// Single-value query string parameters.
	#[serde(default)]
	pub query_string_parameters: Option<BTreeMap<String, String>>,
	/// Raw body, base64-encoded when [`ProxyEvent::is_base64_encoded`] is set.
	#[serde(default)]
	pub body: Option<String>,
	/// Whether [`ProxyEvent::body`] is base64-encoded.
	#[serde(default)]
	pub is_base64_encoded: bool,
	/// Gateway-supplied request context.
	#[serde(default)]
	pub request_context: Option<ProxyRequestContext>,
}
impl ProxyEvent {
	/// Claims attached by the upstream authorizer.
	///
	/// Cognito user-pool authorizers place them under `authorizer.claims`, JWT authorizers
	/// under `authorizer.jwt.claims`. Non-object values are ignored.
	pub fn claims(&self) -> Option<AuthorizerClaims> {
		let authorizer = self.request_context.as_ref()?.authorizer.as_ref()?;
		let raw = authorizer
			.claims
			.as_ref()
			.or_else(|| authorizer.jwt.as_ref().and_then(|jwt| jwt.claims.as_ref()))?;

		AuthorizerClaims::from_value(raw.clone())
	}

	/// Converts the event into an HTTP request carrying claims in its extensions.
	///
	/// The event's path arrives decoded, so it is percent-encoded before it becomes the URI;
	/// an empty path becomes `/`.
	pub fn into_request(self) -> Result<GatewayRequest, GatewayError> {
		let claims = self.claims();
		let body = match self.body {
			Some(body) if self.is_base64_encoded => STANDARD.decode(body)?,
			Some(body) => body.into_bytes(),
			None => Vec::new(),
		};
		let mut uri = Url::parse(URI_BASE)?;

		uri.set_path(&self.path);

		if let Some(query) = self.query_string_parameters.filter(|query| !query.is_empty()) {
			uri.query_pairs_mut().extend_pairs(query);
		}

		let mut builder =
			Request::builder().method(self.http_method.as_str()).uri(&uri[Position::BeforePath..]);

		for (name, value) in self.headers.into_iter().flatten() {
			builder = builder.header(name, value);
		}

		let mut request = builder.body(body)?;

		if let Some(claims) = claims {
			request.extensions_mut().insert(claims);
		}

		Ok(request)
	}
}

/// Gateway-supplied context of a proxy event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequestContext {
	/// Deployment stage that received the request.
	#[serde(default)]
	pub stage: Option<String>,
	/// Authorizer output.
	#[serde(default)]
	pub authorizer: Option<ProxyAuthorizer>,
}

/// Authorizer output inside a proxy event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyAuthorizer {
	/// Claims from a Cognito user-pool authorizer.
	#[serde(default)]
	pub claims: Option<JsonValue>,
	/// Output of a JWT authorizer.
	#[serde(default)]
	pub jwt: Option<JwtAuthorizer>,
}

/// JWT authorizer output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtAuthorizer {
	/// Verified token claims.
	#[serde(default)]
	pub claims: Option<JsonValue>,
}

/// Outbound API Gateway proxy response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
	/// HTTP status code.
	pub status_code: u16,
	/// Response headers; repeated headers are joined with `,`.
	pub headers: BTreeMap<String, String>,
	/// Response body, base64-encoded when it is not valid UTF-8.
	pub body: String,
	/// Whether [`ProxyResponse::body`] is base64-encoded.
	pub is_base64_encoded: bool,
}
impl From<GatewayResponse> for ProxyResponse {
	fn from(response: GatewayResponse) -> Self {
		let (parts, body) = response.into_parts();
		let mut headers = BTreeMap::<String, String>::new();

		for (name, value) in parts.headers.iter() {
			let Ok(value) = value.to_str() else {
				continue;
			};

			headers
				.entry(name.as_str().to_owned())
				.and_modify(|joined| {
					joined.push(',');
					joined.push_str(value);
				})
				.or_insert_with(|| value.to_owned());
		}

		let (body, is_base64_encoded) = match String::from_utf8(body) {
			Ok(text) => (text, false),
			Err(err) => (STANDARD.encode(err.into_bytes()), true),
		};

		Self { status_code: parts.status.as_u16(), headers, body, is_base64_encoded }
	}
}
