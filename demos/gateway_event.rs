//! Runs sample API Gateway proxy events through the default gateway pipeline and prints the
//! proxy responses.

// crates.io
use color_eyre::Result;
use serde_json::json;
// self
use gateway_context::{
	gateway::{Gateway, ProxyEvent},
	oauth::oauth2::http::Method,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let gateway = Gateway::default().route(Method::GET, "/me", |_, context| {
		let user = context.user();

		Ok(json!({ "subject": user.subject(), "username": user.username(), "groups": user.groups }))
	});
	let events = [
		json!({ "httpMethod": "GET", "path": "/prod/hello" }),
		json!({
			"httpMethod": "GET",
			"path": "/staging/me",
			"requestContext": {
				"stage": "staging",
				"authorizer": { "claims": { "sub": "u-42", "username": "dana", "cognito:groups": "[ops]" } }
			}
		}),
		json!({ "httpMethod": "GET", "path": "/dev/me" }),
		json!({ "httpMethod": "OPTIONS", "path": "/prod/hello" }),
		json!({ "httpMethod": "GET", "path": "/prod/missing" }),
	];

	for event in events {
		let event: ProxyEvent = serde_json::from_value(event)?;
		let label = format!("{} {}", event.http_method, event.path);
		let response = gateway.handle_event(event);

		println!("{label} -> {}", serde_json::to_string_pretty(&response)?);
	}

	Ok(())
}
