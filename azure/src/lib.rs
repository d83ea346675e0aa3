use anyhow::Context;

mod auth;
pub use auth::Auth;
use auth::CachedAuthorization;

pub mod management;

#[allow(clippy::declare_interior_mutable_const)] // Clippy doesn't like const http_common::HeaderValue
const APPLICATION_JSON: http_common::HeaderValue = http_common::HeaderValue::from_static("application/json");

trait Client {
	const AUTH_RESOURCE: &'static str;

	fn make_url(&self, path_and_query: std::fmt::Arguments<'_>) -> anyhow::Result<http_common::UriParts>;

	fn request_parameters(&self) -> (
		&Auth,
		&http_common::Client,
		&CachedAuthorization,
		&log2::Logger,
	);
}

enum Url<'a> {
	PathAndQuery(std::fmt::Arguments<'a>),
	Uri(http_common::Uri),
}

impl<'a> From<std::fmt::Arguments<'a>> for Url<'a> {
	fn from(path_and_query: std::fmt::Arguments<'a>) -> Self {
		Url::PathAndQuery(path_and_query)
	}
}

impl From<http_common::Uri> for Url<'_> {
	fn from(uri: http_common::Uri) -> Self {
		Url::Uri(uri)
	}
}

fn make_uri<TClient>(client: &TClient, path_and_query: std::fmt::Arguments<'_>) -> anyhow::Result<http_common::Uri> where TClient: Client {
	let url = client.make_url(path_and_query)?;
	let url = http_common::Uri::from_parts(url).context("could not parse request URL")?;
	Ok(url)
}

fn request<'client, 'url, TClient, TUrl, TBody, TResponse>(
	client: &'client TClient,
	method: http_common::Method,
	url: TUrl,
	body: Option<&TBody>,
) -> impl std::future::Future<Output = anyhow::Result<TResponse>> + 'client
where
	TClient: Client,
	TUrl: Into<Url<'url>>,
	TBody: serde::Serialize + ?Sized,
	TResponse: http_common::FromResponse,
{
	// This fn encapsulates the non-generic parts of `request` to reduce code size from monomorphization.
	fn make_request(
		method: http_common::Method,
		url: anyhow::Result<http_common::Uri>,
		authorization: anyhow::Result<http_common::HeaderValue>,
		body: Option<serde_json::Result<Vec<u8>>>,
	) -> anyhow::Result<http_common::Request<http_common::RequestBody>> {
		let url = url?;
		let authorization = authorization.context("could not get API authorization")?;

		let mut req =
			if let Some(body) = body {
				let mut req = http_common::Request::new(body.context("could not serialize request body")?.into());
				req.headers_mut().insert(http_common::CONTENT_TYPE, APPLICATION_JSON);
				req
			}
			else {
				let mut req = http_common::Request::new(Default::default());
				if method != http_common::Method::GET {
					req.headers_mut().insert(http_common::CONTENT_LENGTH, 0.into());
				}
				req
			};

		*req.method_mut() = method;
		*req.uri_mut() = url;

		req.headers_mut().insert(http_common::AUTHORIZATION, authorization);

		Ok(req)
	}

	let url = match url.into() {
		Url::PathAndQuery(path_and_query) => make_uri(client, path_and_query),
		Url::Uri(uri) => Ok(uri),
	};

	let body = body.map(serde_json::to_vec);

	async move {
		let (auth, http_client, cached_authorization, logger) = client.request_parameters();
		let authorization = cached_authorization.get(auth, http_client, TClient::AUTH_RESOURCE, logger).await;
		let req = make_request(method, url, authorization, body)?;
		let value = http_client.request(req).await?;
		Ok(value)
	}
}
