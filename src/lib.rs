//! Request-context normalization for API-gateway-fronted handlers plus a one-shot OAuth 2.0
//! password-grant (ROPC) token exchange client.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod flows;
pub mod gateway;
pub mod http;
pub mod oauth;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Secret,
		config::ExchangeConfig,
		flows::CredentialExchange,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
	};

	/// Exchange client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestExchange =
		CredentialExchange<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`CredentialExchange`] backed by the reqwest transport used across
	/// integration tests.
	pub fn build_reqwest_test_exchange() -> ReqwestTestExchange {
		CredentialExchange::with_http_client(
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}

	/// Builds an [`ExchangeConfig`] pointing at `token_endpoint` with fixed test credentials.
	pub fn test_exchange_config(token_endpoint: &str) -> ExchangeConfig {
		ExchangeConfig::builder()
			.client_id("test-client")
			.client_secret(Secret::new("test-secret"))
			.username("alice")
			.password(Secret::new("correct horse"))
			.token_endpoint(token_endpoint)
			.build()
			.expect("Failed to build test exchange config.")
	}
}

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::{BTreeMap, BTreeSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
#[cfg(test)] use tokio as _;
