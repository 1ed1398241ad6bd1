// self
use crate::{
	_prelude::*,
	auth::{AuthorizerClaims, TokenResponse},
	context::RequestContext,
	obs::{self, OperationKind, Outcome},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used around async operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("gateway_context.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits the outcome of a normalization once the context has been computed.
///
/// Claims missing expected fields are reported as a warning; they never affect the context.
pub fn record_normalized(context: &RequestContext, claims: Option<&AuthorizerClaims>) {
	obs::record_outcome(OperationKind::Normalize, Outcome::Success);

	#[cfg(feature = "tracing")]
	{
		if let Some(Err(diagnostic)) =
			claims.filter(|claims| !claims.is_empty()).map(AuthorizerClaims::inspect)
		{
			tracing::warn!(
				raw_path = %context.raw_path,
				missing = ?diagnostic.missing,
				"{diagnostic}"
			);
		}

		tracing::debug!(
			raw_path = %context.raw_path,
			normalized_path = %context.normalized_path,
			stage = context.stage.as_deref(),
			authenticated = context.identity.is_some(),
			"request context normalized"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (context, claims);
	}
}

/// Emits the outcome of a password grant. Secrets are never recorded.
pub fn record_exchange(endpoint: &Url, result: &Result<TokenResponse>) {
	let outcome = match result {
		Ok(TokenResponse::Granted(_)) => Outcome::Success,
		Ok(TokenResponse::Rejected(_)) => Outcome::Rejected,
		Err(_) => Outcome::Failure,
	};

	obs::record_outcome(OperationKind::PasswordGrant, outcome);

	#[cfg(feature = "tracing")]
	{
		match result {
			Ok(TokenResponse::Granted(tokens)) => tracing::info!(
				endpoint = %endpoint,
				token_type = tokens.token_type.as_deref(),
				expires_in = tokens.expires_in,
				"token endpoint granted tokens"
			),
			Ok(TokenResponse::Rejected(rejection)) => tracing::warn!(
				endpoint = %endpoint,
				status = rejection.status,
				error = rejection.error(),
				"token endpoint rejected the grant"
			),
			Err(err) => tracing::error!(endpoint = %endpoint, error = %err, "token request failed"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = endpoint;
	}
}

/// Emits the outcome of a gateway dispatch.
pub fn record_dispatch(method: &str, route_path: &str, status: u16) {
	let outcome = match status {
		200..=399 => Outcome::Success,
		400..=499 => Outcome::Rejected,
		_ => Outcome::Failure,
	};

	obs::record_outcome(OperationKind::Dispatch, outcome);

	#[cfg(feature = "tracing")]
	{
		tracing::info!(method, route_path, status, "request dispatched");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, route_path);
	}
}

/// Emits a handler failure that the gateway answered with a generic `500`.
pub fn record_handler_failure(route_path: &str, err: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(route_path, error = %err, "request handler failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (route_path, err);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn operation_span_builds_without_subscriber() {
		let _span = OperationSpan::new(OperationKind::PasswordGrant, "test");
	}

	#[test]
	fn record_dispatch_accepts_any_status() {
		record_dispatch("GET", "/hello", 200);
		record_dispatch("GET", "/missing", 404);
		record_dispatch("GET", "/boom", 500);
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::PasswordGrant, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
