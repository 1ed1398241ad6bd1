//! Minimal request pipeline for gateway-fronted handlers.
//!
//! [`Gateway::handle`] runs the same stages for every request: CORS preflight short-circuit,
//! request-context normalization (the [`Normalizer`] installed as middleware), dispatch on
//! `(method, route path)`, and JSON `404`/`500` fallbacks. Handlers see the original request
//! plus its [`RequestContext`] and return a JSON value.

pub mod cors;
pub mod event;

pub use cors::*;
pub use event::*;

// crates.io
use oauth2::http::{HeaderValue, Method, Request, Response, StatusCode, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	context::{Normalizer, RequestContext},
	obs,
};

/// Request type accepted by the gateway.
pub type GatewayRequest = Request<Vec<u8>>;
/// Response type produced by the gateway.
pub type GatewayResponse = Response<Vec<u8>>;
/// Error type route handlers may return; it is logged and answered with a `500`.
pub type HandlerError = Box<dyn StdError + Send + Sync>;
/// Result type returned by route handlers.
pub type HandlerResult = Result<JsonValue, HandlerError>;

type Handler = Arc<dyn Fn(&GatewayRequest, &RequestContext) -> HandlerResult + Send + Sync>;

const NOT_FOUND_MESSAGE: &str = "Route NOT found";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failures converting proxy events into requests.
#[derive(Debug, ThisError)]
pub enum GatewayError {
	/// Event body flagged as base64 could not be decoded.
	#[error("Proxy event body is not valid base64.")]
	BodyDecode(#[from] base64::DecodeError),
	/// Event method, path, or headers do not form a valid HTTP request.
	#[error("Proxy event cannot be converted into an HTTP request.")]
	InvalidRequest(#[from] oauth2::http::Error),
	/// Event path could not be encoded into a URI.
	#[error("Proxy event path cannot be encoded into a URI.")]
	InvalidPath(#[from] url::ParseError),
}

#[derive(Clone)]
struct Route {
	method: Method,
	path: String,
	handler: Handler,
}
impl Route {
	fn matches(&self, method: &Method, path: &str) -> bool {
		let method_matches =
			self.method == method || (method == Method::HEAD && self.method == Method::GET);

		method_matches && trim_trailing_slash(&self.path) == trim_trailing_slash(path)
	}
}

/// Routes requests through CORS, context normalization, and registered handlers.
#[derive(Clone)]
pub struct Gateway {
	normalizer: Normalizer,
	cors: CorsPolicy,
	routes: Vec<Route>,
}
impl Gateway {
	/// Creates a gateway without routes.
	pub fn new(normalizer: Normalizer, cors: CorsPolicy) -> Self {
		Self { normalizer, cors, routes: Vec::new() }
	}

	/// Registers `handler` for `method` requests whose normalized path equals `path`.
	///
	/// A trailing slash on either side is ignored. The first registered match wins. `GET`
	/// routes also answer `HEAD`, with the body dropped.
	pub fn route<F>(mut self, method: Method, path: impl Into<String>, handler: F) -> Self
	where
		F: 'static + Fn(&GatewayRequest, &RequestContext) -> HandlerResult + Send + Sync,
	{
		self.routes.push(Route { method, path: path.into(), handler: Arc::new(handler) });

		self
	}

	/// Normalizer used for every request.
	pub fn normalizer(&self) -> &Normalizer {
		&self.normalizer
	}

	/// Handles one request. Never fails; errors become JSON `500` responses.
	pub fn handle(&self, mut request: GatewayRequest) -> GatewayResponse {
		if request.method() == Method::OPTIONS {
			return self.cors.preflight();
		}

		let context = self.normalizer.attach(&mut request);
		let route_path = context.route_path();
		let mut response = match self
			.routes
			.iter()
			.find(|route| route.matches(request.method(), route_path))
		{
			Some(route) => match (route.handler)(&request, &context) {
				Ok(body) => json_response(StatusCode::OK, &body),
				Err(err) => {
					obs::record_handler_failure(route_path, &*err);

					message_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
				},
			},
			None => message_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
		};

		if request.method() == Method::HEAD {
			response.body_mut().clear();
		}

		self.cors.apply(response.headers_mut());
		obs::record_dispatch(request.method().as_str(), route_path, response.status().as_u16());

		response
	}

	/// Handles an API Gateway proxy event end to end.
	pub fn handle_event(&self, event: ProxyEvent) -> ProxyResponse {
		match event.into_request() {
			Ok(request) => self.handle(request).into(),
			Err(err) => {
				obs::record_handler_failure("<event>", &err);

				let mut response =
					message_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);

				self.cors.apply(response.headers_mut());

				response.into()
			},
		}
	}
}
impl Default for Gateway {
	/// Built-in stages, the default CORS policy, and the `GET /hello` route.
	fn default() -> Self {
		Self::new(Normalizer::default(), CorsPolicy::default()).route(Method::GET, "/hello", hello)
	}
}
impl Debug for Gateway {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let routes = self
			.routes
			.iter()
			.map(|route| format!("{} {}", route.method, route.path))
			.collect::<Vec<_>>();

		f.debug_struct("Gateway")
			.field("normalizer", &self.normalizer)
			.field("cors", &self.cors)
			.field("routes", &routes)
			.finish()
	}
}

/// Placeholder `GET /hello` handler.
pub fn hello(request: &GatewayRequest, context: &RequestContext) -> HandlerResult {
	let method = request.method().as_str();
	let resource = context.route_path();

	Ok(serde_json::json!({
		"message": format!(
			"I have received your {method} for {resource} and now all you have to do is add code here to process it"
		),
		"method": method,
		"resource": resource,
	}))
}

/// Serializes `body` into a JSON response with `status`.
pub fn json_response(status: StatusCode, body: &JsonValue) -> GatewayResponse {
	match serde_json::to_vec(body) {
		Ok(bytes) => {
			let mut response = Response::new(bytes);

			*response.status_mut() = status;
			response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

			response
		},
		Err(_) => message_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE),
	}
}

fn message_response(status: StatusCode, message: &str) -> GatewayResponse {
	let body = format!("{{\"message\":{}}}", JsonValue::from(message));
	let mut response = Response::new(body.into_bytes());

	*response.status_mut() = status;
	response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	response
}

fn trim_trailing_slash(path: &str) -> &str {
	match path.strip_suffix('/') {
		Some(trimmed) if !trimmed.is_empty() => trimmed,
		_ => path,
	}
}
