// crates.io
use serde_json::{Value, json};
// self
use gateway_context::{
	auth::{AuthorizerClaims, UserIdentity},
	context::{InboundRequest, Normalizer, RequestContext, normalize},
	gateway::{CorsPolicy, Gateway, ProxyEvent, ProxyResponse},
	oauth::oauth2::http::Method,
};

fn event(value: Value) -> ProxyEvent {
	serde_json::from_value(value).expect("Proxy event should deserialize.")
}

fn body(response: &ProxyResponse) -> Value {
	serde_json::from_str(&response.body).expect("Proxy response body should be JSON.")
}

#[test]
fn stage_prefixes_are_stripped_only_at_segment_start() {
	let cases = [
		("/prod/hello", "/hello", Some("/prod")),
		("/dev/a/b", "/a/b", Some("/dev")),
		("/staging/", "/", Some("/staging")),
		("/prod", "", Some("/prod")),
		("/hello", "/hello", None),
		("/api/prod/hello", "/api/prod/hello", None),
		("/production/hello", "/production/hello", None),
		("", "", None),
	];

	for (raw, normalized, stage) in cases {
		let context = normalize(InboundRequest::new(raw));

		assert_eq!(context.raw_path, raw);
		assert_eq!(context.normalized_path, normalized, "{raw}");
		assert_eq!(context.stage.as_deref(), stage, "{raw}");
	}
}

#[test]
fn custom_stages_strip_a_single_prefix() {
	let normalizer =
		Normalizer::with_stages(["/v1", "/beta"]).expect("Custom stage prefixes should be valid.");

	assert_eq!(normalizer.normalize_path("/v1/items"), "/items");
	assert_eq!(normalizer.normalize_path("/beta/v1/items"), "/v1/items");
	assert_eq!(normalizer.normalize_path("/items"), "/items");
	assert_eq!(normalizer.normalize_path("/prod/items"), "/prod/items");
	assert!(Normalizer::with_stages(["prod"]).is_err());
	assert!(Normalizer::with_stages(["/prod/"]).is_err());
}

#[test]
fn identity_is_extracted_or_falls_back_to_unknown() {
	let claims = AuthorizerClaims::from_value(json!({
		"sub": "9f1c",
		"username": "alice",
		"cognito:groups": ["admin", "ops"],
	}))
	.expect("Claims must be a JSON object.");
	let context = normalize(InboundRequest::new("/prod/me").with_claims(&claims));
	let identity = context.identity.as_ref().expect("Claims must produce an identity.");

	assert_eq!(identity.subject(), "9f1c");
	assert_eq!(identity.username(), "alice");
	assert!(identity.in_group("ops"));

	let anonymous = normalize(InboundRequest::new("/prod/me"));

	assert!(anonymous.identity.is_none());
	assert_eq!(anonymous.user().subject(), UserIdentity::UNKNOWN);
	assert_eq!(anonymous.user().username(), UserIdentity::UNKNOWN);
	assert!(anonymous.user().groups.is_empty());
}

#[test]
fn gateway_serves_hello_across_stages() {
	let gateway = Gateway::default();

	for stage in ["/prod", "/dev", "/staging", ""] {
		let response = gateway.handle_event(event(json!({
			"httpMethod": "GET",
			"path": format!("{stage}/hello"),
		})));

		assert_eq!(response.status_code, 200, "{stage}");
		assert_eq!(body(&response)["resource"], "/hello");
		assert_eq!(response.headers["access-control-allow-origin"], "*");
		assert_eq!(response.headers["content-type"], "application/json");
	}
}

#[test]
fn gateway_routes_decoded_event_paths() {
	let gateway = Gateway::default().route(Method::GET, "/hello%20world", |_, context| {
		Ok(json!({ "raw": context.raw_path, "route": context.route_path() }))
	});
	let routed = gateway.handle_event(event(json!({
		"httpMethod": "GET",
		"path": "/prod/hello world",
	})));

	assert_eq!(routed.status_code, 200);
	assert_eq!(body(&routed), json!({ "raw": "/prod/hello%20world", "route": "/hello%20world" }));

	let missing = Gateway::default().handle_event(event(json!({
		"httpMethod": "GET",
		"path": "/prod/hello world",
	})));

	assert_eq!(missing.status_code, 404);
	assert_eq!(body(&missing), json!({ "message": "Route NOT found" }));
}

#[test]
fn gateway_answers_head_for_get_routes() {
	let response =
		Gateway::default().handle_event(event(json!({ "httpMethod": "HEAD", "path": "/prod/hello" })));

	assert_eq!(response.status_code, 200);
	assert_eq!(response.body, "");
	assert_eq!(response.headers["access-control-allow-origin"], "*");
}

#[test]
fn gateway_answers_preflight_and_unknown_routes() {
	let gateway = Gateway::default();
	let preflight = gateway.handle_event(event(json!({
		"httpMethod": "OPTIONS",
		"path": "/prod/anything",
	})));

	assert_eq!(preflight.status_code, 204);
	assert_eq!(preflight.body, "");
	assert!(preflight.headers.contains_key("access-control-allow-methods"));

	let missing = gateway.handle_event(event(json!({ "httpMethod": "DELETE", "path": "/prod/hello" })));

	assert_eq!(missing.status_code, 404);
	assert_eq!(body(&missing), json!({ "message": "Route NOT found" }));
}

#[test]
fn gateway_routes_see_context_and_claims() {
	let gateway = Gateway::new(Normalizer::default(), CorsPolicy::default()).route(
		Method::GET,
		"/profile",
		|request, context| {
			let stored = request
				.extensions()
				.get::<RequestContext>()
				.ok_or("Context must be attached before dispatch.")?;
			let user = context.user();

			Ok(json!({
				"stage": stored.stage,
				"username": user.username(),
				"admin": user.in_group("admin"),
			}))
		},
	);
	let response = gateway.handle_event(event(json!({
		"httpMethod": "GET",
		"path": "/dev/profile",
		"requestContext": {
			"stage": "dev",
			"authorizer": {
				"claims": { "sub": "u1", "cognito:username": "carol", "cognito:groups": "admin,ops" }
			}
		}
	})));

	assert_eq!(response.status_code, 200);
	assert_eq!(body(&response), json!({ "stage": "/dev", "username": "carol", "admin": true }));
}
