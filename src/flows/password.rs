//! Resource Owner Password Credentials grant.
//!
//! [`CredentialExchange::exchange_credentials`] posts the configured credentials to the token
//! endpoint once and classifies what comes back: a token document, an upstream rejection
//! returned as data, or a transport/timeout failure. The request carries the client secret and
//! the user's password in its body; callers must point it at a TLS-protected endpoint.

// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	config::ExchangeConfig,
	flows::CredentialExchange,
	http::TokenHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, OperationKind, OperationSpan, Outcome},
};

impl<C, M> CredentialExchange<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Performs one `password` grant for `config`.
	///
	/// HTTP error statuses are returned as [`TokenResponse::Rejected`]; only transport
	/// failures, unreadable bodies, and elapsed timeouts surface as errors.
	pub async fn exchange_credentials(&self, config: &ExchangeConfig) -> Result<TokenResponse> {
		const KIND: OperationKind = OperationKind::PasswordGrant;

		let span = OperationSpan::new(KIND, "exchange_credentials");

		obs::record_outcome(KIND, Outcome::Attempt);

		let result = span
			.instrument(async move {
				let request = oauth::password_grant_request(config)?;
				let handle = self.http_client.handle(self.timeout);
				let response = handle.call(request).await.map_err(|err| {
					self.transport_mapper.map_transport_error(self.timeout, err)
				})?;

				oauth::parse_token_response(response)
			})
			.await;

		obs::record_exchange(&config.token_endpoint, &result);

		result
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::{_preludet::*, auth::Secret, error::TransportError};

	const FORM_BODY: &str = "grant_type=password&client_id=test-client&client_secret=test-secret\
		&username=alice&password=correct+horse&scope=openid";

	#[tokio::test]
	async fn posts_password_grant_form() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(POST)
					.path("/oauth2/token")
					.header("content-type", "application/x-www-form-urlencoded")
					.header("accept", "application/json")
					.body(FORM_BODY);
				then.status(200).header("content-type", "application/json").body(
					"{\"access_token\":\"T\",\"token_type\":\"bearer\",\"expires_in\":3600}",
				);
			})
			.await;
		let config = test_exchange_config(&server.url("/oauth2/token"));
		let response = build_reqwest_test_exchange()
			.exchange_credentials(&config)
			.await
			.expect("Exchange should succeed.");
		let tokens = response.into_token_set().expect("2xx responses are grants.");

		assert_eq!(tokens.access_token, Some(Secret::new("T")));
		assert_eq!(tokens.expires_in, Some(3600));

		mock.assert_async().await;
	}

	#[tokio::test]
	async fn html_error_pages_are_malformed_bodies() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(POST).path("/token");
				then.status(503).header("content-type", "text/html").body("<h1>down</h1>");
			})
			.await;
		let err = build_reqwest_test_exchange()
			.exchange_credentials(&test_exchange_config(&server.url("/token")))
			.await
			.expect_err("Non-JSON bodies cannot be classified.");

		assert!(matches!(err, Error::Transport(TransportError::MalformedBody { status: 503, .. })));

		mock.assert_calls_async(1).await;
	}
}
