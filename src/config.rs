//! Password-grant exchange configuration, its builder, and the environment loader.
//!
//! Every value is supplied by the caller; nothing is hard-coded. [`ExchangeConfigBuilder`]
//! is the single validation point and doubles as the serde entry point, so configurations
//! parsed from JSON/TOML obey the same rules as ones assembled in code.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Secret},
	error::ConfigError,
};

/// Environment variable holding the OAuth client identifier.
pub const ENV_CLIENT_ID: &str = "ROPC_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "ROPC_CLIENT_SECRET";
/// Environment variable holding the resource owner's username.
pub const ENV_USERNAME: &str = "ROPC_USERNAME";
/// Environment variable holding the resource owner's password.
pub const ENV_PASSWORD: &str = "ROPC_PASSWORD";
/// Environment variable holding the absolute token endpoint URL.
pub const ENV_TOKEN_ENDPOINT: &str = "ROPC_TOKEN_ENDPOINT";
/// Optional environment variable holding a space-delimited scope string.
pub const ENV_SCOPE: &str = "ROPC_SCOPE";

/// Validated inputs for a single password-grant exchange.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ExchangeConfigBuilder")]
pub struct ExchangeConfig {
	/// OAuth client identifier; never empty.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Resource owner's username; never empty.
	pub username: String,
	/// Resource owner's password; never empty.
	pub password: Secret,
	/// Absolute `http`/`https` token endpoint.
	pub token_endpoint: Url,
	/// Requested scopes; `openid` unless configured otherwise.
	pub scope: ScopeSet,
}
impl ExchangeConfig {
	/// Returns a builder for assembling a configuration.
	pub fn builder() -> ExchangeConfigBuilder {
		ExchangeConfigBuilder::default()
	}

	/// Loads the configuration from the `ROPC_*` process environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads the configuration through `lookup`, keyed by the `ROPC_*` variable names.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let builder = ExchangeConfigBuilder {
			client_id: lookup(ENV_CLIENT_ID),
			client_secret: lookup(ENV_CLIENT_SECRET).map(Secret::from),
			username: lookup(ENV_USERNAME),
			password: lookup(ENV_PASSWORD).map(Secret::from),
			token_endpoint: lookup(ENV_TOKEN_ENDPOINT),
			scope: lookup(ENV_SCOPE).map(|raw| raw.parse::<ScopeSet>()).transpose()?,
		};

		builder.build()
	}
}

/// Builder for [`ExchangeConfig`] values.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExchangeConfigBuilder {
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<Secret>,
	/// Resource owner's username.
	pub username: Option<String>,
	/// Resource owner's password.
	pub password: Option<Secret>,
	/// Token endpoint URL, validated on build.
	pub token_endpoint: Option<String>,
	/// Requested scopes; unset or empty falls back to `openid`.
	#[serde(default)]
	pub scope: Option<ScopeSet>,
}
impl ExchangeConfigBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the resource owner's username.
	pub fn username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());

		self
	}

	/// Sets the resource owner's password.
	pub fn password(mut self, password: impl Into<Secret>) -> Self {
		self.password = Some(password.into());

		self
	}

	/// Sets the token endpoint URL.
	pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
		self.token_endpoint = Some(url.into());

		self
	}

	/// Overrides the requested scopes.
	pub fn scope(mut self, scope: ScopeSet) -> Self {
		self.scope = Some(scope);

		self
	}

	/// Validates the collected values and produces an [`ExchangeConfig`].
	pub fn build(self) -> Result<ExchangeConfig, ConfigError> {
		let client_id = non_empty("client_id", self.client_id)?;
		let client_secret =
			self.client_secret.ok_or(ConfigError::MissingField { field: "client_secret" })?;
		let username = non_empty("username", self.username)?;
		let password = self.password.ok_or(ConfigError::MissingField { field: "password" })?;

		if password.is_empty() {
			return Err(ConfigError::EmptyField { field: "password" });
		}

		let raw_endpoint =
			self.token_endpoint.ok_or(ConfigError::MissingField { field: "token_endpoint" })?;
		let token_endpoint = Url::parse(raw_endpoint.trim())
			.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?;

		if !matches!(token_endpoint.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { scheme: token_endpoint.scheme().into() });
		}

		let scope = self.scope.filter(|scope| !scope.is_empty()).unwrap_or_else(ScopeSet::openid);

		Ok(ExchangeConfig { client_id, client_secret, username, password, token_endpoint, scope })
	}
}
impl TryFrom<ExchangeConfigBuilder> for ExchangeConfig {
	type Error = ConfigError;

	fn try_from(builder: ExchangeConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

fn non_empty(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	let value = value.ok_or(ConfigError::MissingField { field })?;

	if value.trim().is_empty() {
		return Err(ConfigError::EmptyField { field });
	}

	Ok(value)
}
