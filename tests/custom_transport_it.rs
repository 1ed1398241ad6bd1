// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex},
	time::Duration,
};
// self
use gateway_context::{
	config::ExchangeConfig,
	error::{Error, TimeoutError, TransportError},
	flows::CredentialExchange,
	http::TokenHttpClient,
	oauth::{
		TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
};

#[derive(Clone, Debug)]
enum FakeTransportError {
	Refused,
	Elapsed,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Refused => write!(f, "Connection refused."),
			Self::Elapsed => write!(f, "Deadline elapsed."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone)]
enum FakeBehavior {
	Respond { status: u16, body: &'static str },
	Fail(FakeTransportError),
}

#[derive(Clone)]
struct FakeHttpClient {
	behavior: FakeBehavior,
	requests: Arc<Mutex<Vec<HttpRequest>>>,
	timeouts: Arc<Mutex<Vec<Option<Duration>>>>,
}
impl FakeHttpClient {
	fn new(behavior: FakeBehavior) -> Self {
		Self { behavior, requests: Default::default(), timeouts: Default::default() }
	}

	fn recorded_bodies(&self) -> Vec<String> {
		self.requests
			.lock()
			.expect("Request log lock should not be poisoned.")
			.iter()
			.map(|request| String::from_utf8_lossy(request.body()).into_owned())
			.collect()
	}
}
impl TokenHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn handle(&self, timeout: Option<Duration>) -> Self::Handle {
		self.timeouts.lock().expect("Timeout log lock should not be poisoned.").push(timeout);

		FakeHttpHandle { behavior: self.behavior.clone(), requests: self.requests.clone() }
	}
}

struct FakeHttpHandle {
	behavior: FakeBehavior,
	requests: Arc<Mutex<Vec<HttpRequest>>>,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.requests.lock().expect("Request log lock should not be poisoned.").push(request);

			match &self.behavior {
				FakeBehavior::Respond { status, body } => {
					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() = (*status)
						.try_into()
						.expect("Fake responses must use valid status codes.");

					Ok(response)
				},
				// The `Reqwest` variant carries any boxed transport error.
				FakeBehavior::Fail(error) => Err(HttpClientError::Reqwest(Box::new(error.clone()))),
			}
		})
	}
}

#[derive(Clone, Copy, Default)]
struct FakeTransportErrorMapper;
impl TransportErrorMapper<FakeTransportError> for FakeTransportErrorMapper {
	fn map_transport_error(
		&self,
		timeout: Option<Duration>,
		error: HttpClientError<FakeTransportError>,
	) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => match *inner {
				FakeTransportError::Elapsed => TimeoutError::new(timeout, Some(inner)).into(),
				FakeTransportError::Refused => TransportError::network(*inner).into(),
			},
			other => TransportError::Other { message: other.to_string() }.into(),
		}
	}
}

fn build_config() -> ExchangeConfig {
	ExchangeConfig::builder()
		.client_id("fake-client")
		.client_secret("fake-secret")
		.username("bob")
		.password("hunter2")
		.token_endpoint("https://auth.example.com/oauth2/token")
		.build()
		.expect("Exchange config should build for fake transport tests.")
}

fn build_exchange(
	client: &FakeHttpClient,
) -> CredentialExchange<FakeHttpClient, FakeTransportErrorMapper> {
	CredentialExchange::with_http_client(client.clone(), FakeTransportErrorMapper)
}

#[tokio::test]
async fn fake_transport_receives_one_form_request_per_call() {
	let client = FakeHttpClient::new(FakeBehavior::Respond {
		status: 200,
		body: "{\"access_token\":\"fake-access\",\"expires_in\":60}",
	});
	let exchange = build_exchange(&client).with_timeout(Duration::from_secs(5));
	let response =
		exchange.exchange_credentials(&build_config()).await.expect("Fake exchange should succeed.");

	assert_eq!(
		response.token_set().and_then(|tokens| tokens.access_token.as_ref()).map(|t| t.expose()),
		Some("fake-access")
	);
	assert_eq!(client.recorded_bodies(), [
		"grant_type=password&client_id=fake-client&client_secret=fake-secret&username=bob\
		 &password=hunter2&scope=openid"
	]);
	assert_eq!(
		*client.timeouts.lock().expect("Timeout log lock should not be poisoned."),
		[Some(Duration::from_secs(5))]
	);
}

#[tokio::test]
async fn fake_transport_rejections_stay_data() {
	let client = FakeHttpClient::new(FakeBehavior::Respond {
		status: 401,
		body: "{\"error\":\"invalid_client\"}",
	});
	let response = build_exchange(&client)
		.exchange_credentials(&build_config())
		.await
		.expect("Rejections are not errors.");
	let rejection = response.rejection().expect("401 responses are rejections.");

	assert_eq!(rejection.status, 401);
	assert_eq!(rejection.error(), Some("invalid_client"));
}

#[tokio::test]
async fn fake_mapper_separates_timeouts_from_transport_failures() {
	let refused = FakeHttpClient::new(FakeBehavior::Fail(FakeTransportError::Refused));
	let err = build_exchange(&refused)
		.exchange_credentials(&build_config())
		.await
		.expect_err("Refused connections must fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));

	let elapsed = FakeHttpClient::new(FakeBehavior::Fail(FakeTransportError::Elapsed));
	let err = build_exchange(&elapsed)
		.with_timeout(Duration::from_millis(750))
		.exchange_credentials(&build_config())
		.await
		.expect_err("Elapsed deadlines must fail.");

	match err {
		Error::Timeout(timeout) => assert_eq!(timeout.timeout, Some(Duration::from_millis(750))),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
