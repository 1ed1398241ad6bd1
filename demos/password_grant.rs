//! Exchanges resource-owner credentials for tokens using the `ROPC_*` environment variables.
//!
//! ```sh
//! ROPC_CLIENT_ID=... ROPC_CLIENT_SECRET=... ROPC_USERNAME=... ROPC_PASSWORD=... \
//! ROPC_TOKEN_ENDPOINT=https://auth.example.com/oauth2/token \
//! cargo run --example password_grant
//! ```
//!
//! Secrets are printed redacted; only their presence and the token metadata are shown.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
// self
use gateway_context::{
	auth::TokenResponse, config::ExchangeConfig, flows::ReqwestCredentialExchange,
	http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ExchangeConfig::from_env()?;
	let exchange = ReqwestCredentialExchange::with_http_client(
		ReqwestHttpClient::without_redirects()?,
		ReqwestTransportErrorMapper,
	)
	.with_timeout(Duration::from_secs(10));

	println!("Requesting tokens from {} as {}.", config.token_endpoint, config.username);

	match exchange.exchange_credentials(&config).await? {
		TokenResponse::Granted(tokens) => {
			println!("Access token: {:?}.", tokens.access_token);
			println!("ID token present: {}.", tokens.id_token.is_some());
			println!("Refresh token present: {}.", tokens.refresh_token.is_some());
			println!("Expires in: {:?} seconds.", tokens.expires_in);
		},
		TokenResponse::Rejected(rejection) => {
			println!("Token endpoint answered HTTP {}: {}.", rejection.status, rejection.body);
		},
	}

	Ok(())
}
