//! Polling of long-running operations.
//!
//! A create, update or delete of an environment-like resource may be answered with `201 Created` or `202 Accepted`
//! instead of its final result. The response then carries an `Azure-AsyncOperation` status URL and/or a `Location` URL
//! that are polled until the operation reaches a terminal state.

use anyhow::Context;

const MIN_RETRY_AFTER: std::time::Duration = std::time::Duration::from_secs(1);
const MAX_RETRY_AFTER: std::time::Duration = std::time::Duration::from_secs(30);

impl super::Client<'_> {
	pub(super) async fn long_running<TBody, T>(
		&self,
		method: http_common::Method,
		url: http_common::Uri,
		body: Option<&TBody>,
	) -> anyhow::Result<Option<T>>
	where
		TBody: serde::Serialize + ?Sized,
		T: serde::de::DeserializeOwned,
	{
		let final_get = FinalGet::for_method(&method);

		let mut response: Operation<T> = crate::request(self, method, url.clone(), body).await?;
		let mut previous_location = None;

		loop {
			let Pending { azure_async_operation, location, retry_after } = match response {
				Operation::Done(value) => return Ok(value),
				Operation::Pending(pending) => pending,
			};

			if let Some(status_url) = azure_async_operation {
				self.wait_for_async_operation(&status_url, retry_after).await?;

				let final_url = match final_get {
					FinalGet::OriginalUrl => Some(url),
					FinalGet::Location => location,
					FinalGet::None => None,
				};
				let Some(final_url) = final_url else { return Ok(None); };

				let FinalResponse(value) = crate::request(self, http_common::Method::GET, final_url, None::<&()>).await?;
				return Ok(value);
			}

			// A 202 without a new Location keeps polling the previous one.
			let Some(poll_url) = location.or_else(|| previous_location.take()) else { return Ok(None); };

			self.logger.report_message(format_args!("Waiting for {retry_after:?} before rechecking async operation {poll_url} ..."));
			tokio::time::sleep(retry_after).await;

			response = crate::request(self, http_common::Method::GET, poll_url.clone(), None::<&()>).await?;
			previous_location = Some(poll_url);
		}
	}

	async fn wait_for_async_operation(&self, status_url: &http_common::Uri, mut retry_after: std::time::Duration) -> anyhow::Result<()> {
		loop {
			self.logger.report_message(format_args!("Waiting for {retry_after:?} before rechecking async operation {status_url} ..."));
			tokio::time::sleep(retry_after).await;

			let AsyncOperationStatus { state, error, retry_after: next_retry_after } =
				crate::request(self, http_common::Method::GET, status_url.clone(), None::<&()>).await?;

			self.logger.report_state("azure/async_operation", status_url.path(), format_args!("{state:?}"));

			match state {
				AsyncOperationState::InProgress => retry_after = next_retry_after,

				AsyncOperationState::Succeeded => return Ok(()),

				AsyncOperationState::Failed |
				AsyncOperationState::Canceled => {
					let err = anyhow::anyhow!("async operation {status_url} did not succeed: {state:?}");
					return Err(match error {
						Some(error) => err.context(error),
						None => err,
					});
				},
			}
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FinalGet {
	/// PUT and PATCH: the resource is read back from the URL it was written to.
	OriginalUrl,

	/// POST: the result, if any, is at the `Location` of the initial response.
	Location,

	/// DELETE: nothing to read back.
	None,
}

impl FinalGet {
	fn for_method(method: &http_common::Method) -> Self {
		if method == http_common::Method::PUT || method == http_common::Method::PATCH {
			FinalGet::OriginalUrl
		}
		else if method == http_common::Method::DELETE {
			FinalGet::None
		}
		else {
			FinalGet::Location
		}
	}
}

#[derive(Debug)]
enum Operation<T> {
	Done(Option<T>),
	Pending(Pending),
}

#[derive(Debug)]
struct Pending {
	azure_async_operation: Option<http_common::Uri>,
	location: Option<http_common::Uri>,
	retry_after: std::time::Duration,
}

impl<T> http_common::FromResponse for Operation<T> where T: serde::de::DeserializeOwned {
	fn from_response(
		status: http_common::StatusCode,
		body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		if !matches!(
			status,
			http_common::StatusCode::OK |
			http_common::StatusCode::CREATED |
			http_common::StatusCode::ACCEPTED |
			http_common::StatusCode::NO_CONTENT
		) {
			return Ok(None);
		}

		let azure_async_operation = http_common::get_azure_async_operation(&headers)?;

		if azure_async_operation.is_some() || status == http_common::StatusCode::ACCEPTED {
			let location =
				if headers.contains_key(http_common::LOCATION) {
					Some(http_common::get_location(&headers)?)
				}
				else {
					None
				};
			let retry_after = http_common::get_retry_after(&headers, MIN_RETRY_AFTER, MAX_RETRY_AFTER)?;
			return Ok(Some(Operation::Pending(Pending {
				azure_async_operation,
				location,
				retry_after,
			})));
		}

		let FinalResponse(value) = FinalResponse::from_response(status, body, headers)?.context("unexpected final response")?;
		Ok(Some(Operation::Done(value)))
	}
}

/// The result of a completed operation. `204 No Content` and bodyless `200 OK` have no result.
struct FinalResponse<T>(Option<T>);

impl<T> http_common::FromResponse for FinalResponse<T> where T: serde::de::DeserializeOwned {
	fn from_response(
		status: http_common::StatusCode,
		body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match (status, body) {
			(http_common::StatusCode::OK | http_common::StatusCode::CREATED, Some(body)) => Some(FinalResponse(Some(body.as_json()?))),
			(http_common::StatusCode::OK | http_common::StatusCode::CREATED | http_common::StatusCode::NO_CONTENT, _) => Some(FinalResponse(None)),
			_ => None,
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AsyncOperationState {
	InProgress,
	Succeeded,
	Failed,
	Canceled,
}

impl AsyncOperationState {
	// Services report intermediate states under various names ("InProgress", "Running", "Accepted", ...),
	// so anything that isn't terminal is in progress.
	fn parse(s: &str) -> Self {
		if s.eq_ignore_ascii_case("Succeeded") {
			AsyncOperationState::Succeeded
		}
		else if s.eq_ignore_ascii_case("Failed") {
			AsyncOperationState::Failed
		}
		else if s.eq_ignore_ascii_case("Canceled") || s.eq_ignore_ascii_case("Cancelled") {
			AsyncOperationState::Canceled
		}
		else {
			AsyncOperationState::InProgress
		}
	}
}

struct AsyncOperationStatus {
	state: AsyncOperationState,
	error: Option<http_common::ApiError>,
	retry_after: std::time::Duration,
}

impl http_common::FromResponse for AsyncOperationStatus {
	fn from_response(
		status: http_common::StatusCode,
		body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		#[derive(serde::Deserialize)]
		struct ResponseInner {
			status: String,
			#[serde(default)]
			error: Option<ResponseError>,
		}

		#[derive(serde::Deserialize)]
		struct ResponseError {
			#[serde(default)]
			code: String,
			#[serde(default)]
			message: String,
		}

		Ok(match (status, body) {
			(http_common::StatusCode::OK | http_common::StatusCode::ACCEPTED, Some(body)) => {
				let ResponseInner { status, error } = body.as_json()?;
				let retry_after = http_common::get_retry_after(&headers, MIN_RETRY_AFTER, MAX_RETRY_AFTER)?;
				Some(AsyncOperationStatus {
					state: AsyncOperationState::parse(&status),
					error: error.map(|ResponseError { code, message }| http_common::ApiError { code, message }),
					retry_after,
				})
			},
			_ => None,
		})
	}
}

#[cfg(test)]
mod tests {
	use http_common::FromResponse;

	use super::{AsyncOperationState, AsyncOperationStatus, FinalGet, Operation, Pending};
	use super::super::test_server::{TestResponse, TestServer};

	fn json(body: &'static str) -> http_common::ResponseBody<std::io::Empty> {
		http_common::ResponseBody::new(http_common::HeaderValue::from_static("application/json"), body.as_bytes())
	}

	fn headers(pairs: &[(&'static str, &'static str)]) -> http_common::HeaderMap {
		let mut headers = http_common::HeaderMap::new();
		for &(name, value) in pairs {
			headers.insert(http_common::HeaderName::from_static(name), http_common::HeaderValue::from_static(value));
		}
		headers
	}

	#[test]
	fn final_get() {
		assert_eq!(FinalGet::for_method(&http_common::Method::PUT), FinalGet::OriginalUrl);
		assert_eq!(FinalGet::for_method(&http_common::Method::PATCH), FinalGet::OriginalUrl);
		assert_eq!(FinalGet::for_method(&http_common::Method::POST), FinalGet::Location);
		assert_eq!(FinalGet::for_method(&http_common::Method::DELETE), FinalGet::None);
	}

	#[test]
	fn completes_synchronously() {
		let response: Operation<serde_json::Value> =
			Operation::from_response(http_common::StatusCode::OK, Some(&mut json(r#"{"name":"ase1"}"#)), Default::default()).unwrap().unwrap();
		let Operation::Done(Some(value)) = response else { panic!("{response:?}") };
		assert_eq!(value["name"], "ase1");

		let response: Operation<serde_json::Value> =
			Operation::from_response(http_common::StatusCode::CREATED, Some(&mut json(r#"{"name":"ase1"}"#)), Default::default()).unwrap().unwrap();
		assert!(matches!(response, Operation::Done(Some(_))));

		let response: Operation<serde_json::Value> =
			Operation::from_response(http_common::StatusCode::NO_CONTENT, None::<&mut http_common::ResponseBody<std::io::Empty>>, Default::default()).unwrap().unwrap();
		assert!(matches!(response, Operation::Done(None)));
	}

	#[test]
	fn pending_with_async_operation() {
		let response: Operation<serde_json::Value> =
			Operation::from_response(
				http_common::StatusCode::CREATED,
				Some(&mut json(r#"{"properties":{"provisioningState":"InProgress"}}"#)),
				headers(&[
					("azure-asyncoperation", "https://management.azure.com/subscriptions/sub/providers/Microsoft.Web/locations/westus/operations/1?api-version=2015-08-01"),
					("retry-after", "10"),
				]),
			).unwrap().unwrap();
		let Operation::Pending(Pending { azure_async_operation, location, retry_after }) = response else { panic!("{response:?}") };
		assert_eq!(azure_async_operation.unwrap().path(), "/subscriptions/sub/providers/Microsoft.Web/locations/westus/operations/1");
		assert!(location.is_none());
		assert_eq!(retry_after, std::time::Duration::from_secs(10));
	}

	#[test]
	fn pending_with_location() {
		let response: Operation<serde_json::Value> =
			Operation::from_response(
				http_common::StatusCode::ACCEPTED,
				None::<&mut http_common::ResponseBody<std::io::Empty>>,
				headers(&[
					("location", "https://management.azure.com/subscriptions/sub/providers/Microsoft.Web/locations/westus/operationResults/1?api-version=2015-08-01"),
					("retry-after", "600"),
				]),
			).unwrap().unwrap();
		let Operation::Pending(Pending { azure_async_operation, location, retry_after }) = response else { panic!("{response:?}") };
		assert!(azure_async_operation.is_none());
		assert_eq!(location.unwrap().path(), "/subscriptions/sub/providers/Microsoft.Web/locations/westus/operationResults/1");
		assert_eq!(retry_after, super::MAX_RETRY_AFTER);

		let response: Operation<serde_json::Value> =
			Operation::from_response(http_common::StatusCode::ACCEPTED, None::<&mut http_common::ResponseBody<std::io::Empty>>, Default::default()).unwrap().unwrap();
		let Operation::Pending(Pending { azure_async_operation: None, location: None, retry_after }) = response else { panic!("{response:?}") };
		assert_eq!(retry_after, super::MIN_RETRY_AFTER);
	}

	#[test]
	fn unexpected_status() {
		let response: Option<Operation<serde_json::Value>> =
			Operation::from_response(http_common::StatusCode::CONFLICT, Some(&mut json(r#"{"error":{"code":"Conflict","message":""}}"#)), Default::default()).unwrap();
		assert!(response.is_none());
	}

	#[test]
	fn async_operation_states() {
		assert_eq!(AsyncOperationState::parse("InProgress"), AsyncOperationState::InProgress);
		assert_eq!(AsyncOperationState::parse("Running"), AsyncOperationState::InProgress);
		assert_eq!(AsyncOperationState::parse("succeeded"), AsyncOperationState::Succeeded);
		assert_eq!(AsyncOperationState::parse("Failed"), AsyncOperationState::Failed);
		assert_eq!(AsyncOperationState::parse("Canceled"), AsyncOperationState::Canceled);
		assert_eq!(AsyncOperationState::parse("Cancelled"), AsyncOperationState::Canceled);
	}

	#[test]
	fn async_operation_status() {
		let AsyncOperationStatus { state, error, retry_after } =
			AsyncOperationStatus::from_response(
				http_common::StatusCode::OK,
				Some(&mut json(r#"{"status":"Failed","error":{"code":"HostingEnvironmentCreationFailed","message":"Subnet is in use."}}"#)),
				headers(&[("retry-after", "5")]),
			).unwrap().unwrap();
		assert_eq!(state, AsyncOperationState::Failed);
		let error = error.unwrap();
		assert_eq!(error.code, "HostingEnvironmentCreationFailed");
		assert_eq!(error.message, "Subnet is in use.");
		assert_eq!(retry_after, std::time::Duration::from_secs(5));

		let AsyncOperationStatus { state, error, .. } =
			AsyncOperationStatus::from_response(http_common::StatusCode::OK, Some(&mut json(r#"{"status":"InProgress"}"#)), Default::default()).unwrap().unwrap();
		assert_eq!(state, AsyncOperationState::InProgress);
		assert!(error.is_none());
	}

	#[tokio::test]
	async fn put_polls_async_operation_then_reads_resource() {
		let auth = super::super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::super::test_client_authorized(&auth, &logger);

		let mut server = TestServer::bind().await;
		server.serve(vec![
			TestResponse::new(http_common::StatusCode::CREATED)
				.header("azure-asyncoperation", server.url("/op").to_string())
				.json(serde_json::json!({ "name": "ase1", "properties": { "provisioningState": "InProgress" } })),
			TestResponse::new(http_common::StatusCode::OK).json(serde_json::json!({ "status": "InProgress" })),
			TestResponse::new(http_common::StatusCode::OK).json(serde_json::json!({ "status": "Succeeded" })),
			TestResponse::new(http_common::StatusCode::OK).json(serde_json::json!({ "name": "ase1", "properties": { "provisioningState": "Succeeded" } })),
		]);

		let value: Option<serde_json::Value> =
			client.long_running(http_common::Method::PUT, server.url("/res"), Some(&serde_json::json!({ "location": "West US" }))).await.unwrap();
		assert_eq!(value.unwrap()["properties"]["provisioningState"], "Succeeded");
		assert_eq!(server.requests(), ["PUT /res", "GET /op", "GET /op", "GET /res"]);
	}

	#[tokio::test]
	async fn post_polls_previous_location() {
		let auth = super::super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::super::test_client_authorized(&auth, &logger);

		let mut server = TestServer::bind().await;
		server.serve(vec![
			TestResponse::new(http_common::StatusCode::ACCEPTED).header("location", server.url("/result").to_string()),
			TestResponse::new(http_common::StatusCode::ACCEPTED),
			TestResponse::new(http_common::StatusCode::OK).json(serde_json::json!({ "value": [{ "name": "site1" }] })),
		]);

		let value: Option<serde_json::Value> =
			client.long_running(http_common::Method::POST, server.url("/suspend"), None::<&()>).await.unwrap();
		assert_eq!(value.unwrap()["value"][0]["name"], "site1");
		assert_eq!(server.requests(), ["POST /suspend", "GET /result", "GET /result"]);
	}

	#[tokio::test]
	async fn failed_async_operation_is_an_error() {
		let auth = super::super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::super::test_client_authorized(&auth, &logger);

		let mut server = TestServer::bind().await;
		server.serve(vec![
			TestResponse::new(http_common::StatusCode::ACCEPTED).header("azure-asyncoperation", server.url("/op").to_string()),
			TestResponse::new(http_common::StatusCode::OK)
				.json(serde_json::json!({ "status": "Failed", "error": { "code": "SubnetInUse", "message": "Subnet is in use." } })),
		]);

		let err =
			client.long_running::<(), serde_json::Value>(http_common::Method::DELETE, server.url("/res"), None).await.unwrap_err();
		assert_eq!(err.to_string(), "SubnetInUse: Subnet is in use.");
		assert!(format!("{err:#}").contains("did not succeed: Failed"));
		assert_eq!(server.requests(), ["DELETE /res", "GET /op"]);
	}

	#[tokio::test]
	async fn canceled_async_operation_is_an_error() {
		let auth = super::super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::super::test_client_authorized(&auth, &logger);

		let mut server = TestServer::bind().await;
		server.serve(vec![
			TestResponse::new(http_common::StatusCode::CREATED).header("azure-asyncoperation", server.url("/op").to_string()),
			TestResponse::new(http_common::StatusCode::OK).json(serde_json::json!({ "status": "Canceled" })),
		]);

		let err =
			client.long_running::<(), serde_json::Value>(http_common::Method::PUT, server.url("/res"), None).await.unwrap_err();
		assert!(err.to_string().ends_with("did not succeed: Canceled"));
		assert_eq!(server.requests(), ["PUT /res", "GET /op"]);
	}

	#[tokio::test]
	async fn delete_accepted_without_headers_is_done() {
		let auth = super::super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::super::test_client_authorized(&auth, &logger);

		let mut server = TestServer::bind().await;
		server.serve(vec![
			TestResponse::new(http_common::StatusCode::ACCEPTED),
		]);

		let value: Option<serde_json::Value> =
			client.long_running(http_common::Method::DELETE, server.url("/res"), None::<&()>).await.unwrap();
		assert!(value.is_none());
		assert_eq!(server.requests(), ["DELETE /res"]);
	}

	#[tokio::test]
	async fn conflict_is_an_error() {
		let auth = super::super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::super::test_client_authorized(&auth, &logger);

		let mut server = TestServer::bind().await;
		server.serve(vec![
			TestResponse::new(http_common::StatusCode::CONFLICT)
				.json(serde_json::json!({ "error": { "code": "Conflict", "message": "Operation in progress." } })),
		]);

		let err =
			client.long_running::<(), serde_json::Value>(http_common::Method::PUT, server.url("/res"), None).await.unwrap_err();
		assert_eq!(err.to_string(), "Conflict: Operation in progress.");
		assert!(format!("{err:#}").contains("unexpected response 409 Conflict"));
	}
}
