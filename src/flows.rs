//! One-shot credential exchange client.

mod password;

// self
use crate::{_prelude::*, http::TokenHttpClient, oauth::TransportErrorMapper};
#[cfg(feature = "reqwest")]
use crate::{
	auth::TokenResponse, config::ExchangeConfig, http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
};

#[cfg(feature = "reqwest")]
/// Exchange client specialized for the crate's default reqwest transport stack.
pub type ReqwestCredentialExchange =
	CredentialExchange<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Performs OAuth 2.0 password grants against the token endpoint named by each
/// [`ExchangeConfig`](crate::config::ExchangeConfig).
///
/// The client owns only the transport, the error mapper, and an optional timeout; every call
/// is independent, issues exactly one request, and never retries. Repeating a call performs a
/// fresh exchange, which providers may rate limit.
#[derive(Clone)]
pub struct CredentialExchange<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for the outbound token request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Optional limit on how long a single exchange may take; unset means no limit.
	pub timeout: Option<StdDuration>,
}
impl<C, M> CredentialExchange<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an exchange client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(http_client: impl Into<Arc<C>>, mapper: impl Into<Arc<M>>) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), timeout: None }
	}

	/// Sets or replaces the per-exchange timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}
}
#[cfg(feature = "reqwest")]
impl CredentialExchange<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an exchange client backed by a default reqwest transport.
	pub fn new() -> Self {
		Self::with_http_client(ReqwestHttpClient::default(), Arc::new(ReqwestTransportErrorMapper))
	}
}
#[cfg(feature = "reqwest")]
impl Default for CredentialExchange<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	fn default() -> Self {
		Self::new()
	}
}
impl<C, M> Debug for CredentialExchange<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialExchange").field("timeout", &self.timeout).finish()
	}
}

/// Performs a single password grant with the default reqwest transport and no timeout.
#[cfg(feature = "reqwest")]
pub async fn exchange_credentials(config: &ExchangeConfig) -> Result<TokenResponse> {
	ReqwestCredentialExchange::new().exchange_credentials(config).await
}
