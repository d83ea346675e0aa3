use anyhow::Context;

pub use http::uri::{
	Authority as UriAuthority,
	Parts as UriParts,
	Scheme as UriScheme,
};

pub use hyper::{
	Method,
	Request,
	StatusCode,
	Uri,
	body::Bytes,
	header::{
		AUTHORIZATION,
		CONTENT_LENGTH,
		CONTENT_TYPE,
		HeaderMap,
		HeaderName,
		HeaderValue,
		LOCATION,
		RETRY_AFTER,
	},
};

#[allow(clippy::declare_interior_mutable_const)] // Clippy doesn't like const http::HeaderName
pub const AZURE_ASYNCOPERATION: HeaderName = HeaderName::from_static("azure-asyncoperation");

pub struct Client {
	inner: hyper_util::client::legacy::Client<
		hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
		RequestBody,
	>,
	user_agent: HeaderValue,
}

impl Client {
	pub fn new(user_agent: HeaderValue) -> anyhow::Result<Self> {
		let connector =
			hyper_rustls::HttpsConnectorBuilder::new()
			.with_webpki_roots()
			.https_or_http()
			.enable_http1()
			.build();

		let inner = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

		Ok(Client {
			inner,
			user_agent,
		})
	}

	pub async fn request<T>(&self, req: Request<RequestBody>) -> anyhow::Result<T> where T: FromResponse {
		// This fn encapsulates the non-generic parts of `request` to reduce code size from monomorphization.
		async fn request_inner(client: &Client, mut req: Request<RequestBody>) ->
			anyhow::Result<(
				StatusCode,
				HeaderMap,
				Option<ResponseBody<impl std::io::Read>>,
			)>
		{
			req.headers_mut().insert(hyper::header::USER_AGENT, client.user_agent.clone());

			let res = client.inner.request(req).await.context("could not execute request")?;

			let (http::response::Parts { status, mut headers, .. }, mut body) = res.into_parts();

			let body = match headers.remove(CONTENT_TYPE) {
				Some(content_type) => {
					let first = http_body_util::BodyExt::frame(&mut body).await.transpose().context("could not read response body")?;
					let body =
						if let Some(first) = first {
							let first = first.into_data().map_err(|_| anyhow::anyhow!("could not read response body: not a data frame"))?;

							let second = http_body_util::BodyExt::frame(&mut body).await.transpose().context("could not read response body")?;
							if let Some(second) = second {
								let second = second.into_data().map_err(|_| anyhow::anyhow!("could not read response body: not a data frame"))?;

								let rest = http_body_util::BodyExt::collect(body).await.context("could not read response body")?.aggregate();
								let rest = hyper::body::Buf::reader(hyper::body::Buf::chain(second, rest));

								ResponseBody {
									content_type,
									first,
									rest: Some(rest),
								}
							}
							else {
								ResponseBody {
									content_type,
									first,
									rest: None,
								}
							}
						}
						else {
							ResponseBody {
								content_type,
								first: Default::default(),
								rest: None,
							}
						};
					Some(body)
				},

				None => None,
			};

			Ok((status, headers, body))
		}

		let (status, headers, mut body) = request_inner(self, req).await?;

		let err = match T::from_response(status, body.as_mut(), headers) {
			Ok(Some(value)) => return Ok(value),
			Ok(None) => None,
			Err(err) => Some(err),
		};

		let body = body.map(|mut body| {
			let mut body_vec = body.first.to_vec();
			if let Some(rest) = &mut body.rest {
				std::io::Read::read_to_end(rest, &mut body_vec).expect("cannot fail to read Buf to end");
			}
			(body.content_type, Bytes::from(body_vec))
		});

		let api_error = body.as_ref().and_then(|(content_type, body)| ApiError::parse(content_type, body));

		let err = match err {
			Some(err) => err.context(format!("unexpected response {status}: {body:?}")),
			None => anyhow::anyhow!("unexpected response {status}: {body:?}"),
		};
		match api_error {
			Some(api_error) => Err(err.context(api_error)),
			None => Err(err),
		}
	}
}

pub struct RequestBody(http_body_util::Full<Bytes>);

impl Default for RequestBody {
	fn default() -> Self {
		Self(Default::default())
	}
}

impl<T> From<T> for RequestBody where T: Into<Bytes> {
	fn from(buf: T) -> Self {
		let buf: Bytes = buf.into();
		Self(buf.into())
	}
}

impl hyper::body::Body for RequestBody {
	type Data = Bytes;
	type Error = std::convert::Infallible;

	fn poll_frame(mut self: std::pin::Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> std::task::Poll<Option<Result<hyper::body::Frame<Self::Data>, Self::Error>>> {
		std::pin::Pin::new(&mut self.0).poll_frame(cx)
	}

	fn is_end_stream(&self) -> bool {
		self.0.is_end_stream()
	}

	fn size_hint(&self) -> hyper::body::SizeHint {
		self.0.size_hint()
	}
}

pub trait FromResponse: Sized {
	fn from_response(
		status: StatusCode,
		body: Option<&mut ResponseBody<impl std::io::Read>>,
		headers: HeaderMap,
	) -> anyhow::Result<Option<Self>>;
}

pub struct ResponseBody<R> {
	content_type: HeaderValue,
	first: Bytes,
	rest: Option<R>,
}

impl ResponseBody<std::io::Empty> {
	/// Wraps a body that has already been read into memory.
	pub fn new(content_type: HeaderValue, body: impl Into<Bytes>) -> Self {
		ResponseBody {
			content_type,
			first: body.into(),
			rest: None,
		}
	}
}

impl<R> ResponseBody<R> where R: std::io::Read {
	pub fn as_json<'de, T>(&'de mut self) -> anyhow::Result<T> where T: serde::Deserialize<'de> {
		if !is_json(&self.content_type) {
			return Err(anyhow::anyhow!("response body does not have content-type:application/json"));
		}

		let first = &self.first[..];
		Ok(match &mut self.rest {
			Some(rest) => serde::Deserialize::deserialize(&mut serde_json::Deserializer::from_reader(std::io::Read::chain(first, rest)))?,
			None => serde::Deserialize::deserialize(&mut serde_json::Deserializer::from_slice(first))?,
		})
	}
}

fn is_json(content_type: &HeaderValue) -> bool {
	content_type.to_str()
	.is_ok_and(|content_type| content_type == "application/json" || content_type.starts_with("application/json;"))
}

/// The `{ "error": { "code", "message" } }` envelope that management APIs return alongside error statuses.
#[derive(Debug)]
pub struct ApiError {
	pub code: String,
	pub message: String,
}

impl ApiError {
	fn parse(content_type: &HeaderValue, body: &[u8]) -> Option<Self> {
		#[derive(serde::Deserialize)]
		struct Envelope {
			error: ApiErrorInner,
		}

		#[derive(serde::Deserialize)]
		struct ApiErrorInner {
			code: String,
			#[serde(default)]
			message: String,
		}

		if !is_json(content_type) {
			return None;
		}

		let Envelope { error: ApiErrorInner { code, message } } = serde_json::from_slice(body).ok()?;
		Some(ApiError { code, message })
	}
}

impl std::fmt::Display for ApiError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.code, self.message)
	}
}

impl std::error::Error for ApiError {}

pub fn get_location(headers: &HeaderMap) -> anyhow::Result<Uri> {
	let location =
		headers
		.get(LOCATION).context("missing location header")?
		.as_bytes()
		.try_into().context("could not parse location header")?;
	Ok(location)
}

pub fn get_azure_async_operation(headers: &HeaderMap) -> anyhow::Result<Option<Uri>> {
	let Some(azure_async_operation) = headers.get(AZURE_ASYNCOPERATION) else { return Ok(None); };

	let azure_async_operation =
		azure_async_operation
		.as_bytes()
		.try_into().context("could not parse azure-asyncoperation header")?;
	Ok(Some(azure_async_operation))
}

pub fn get_retry_after(
	headers: &HeaderMap,
	min: std::time::Duration,
	max: std::time::Duration,
) -> anyhow::Result<std::time::Duration> {
	let Some(retry_after) = headers.get(RETRY_AFTER) else { return Ok(min); };

	let retry_after = retry_after.to_str().context("could not parse retry-after header")?;

	// Ref:
	//
	// - https://tools.ietf.org/html/rfc7231#section-7.1.3
	// - https://tools.ietf.org/html/rfc7231#section-7.1.1.1

	let retry_after =
		if let Ok(secs) = retry_after.parse() {
			std::time::Duration::from_secs(secs)
		}
		else if let Ok(date) = httpdate::parse_http_date(retry_after) {
			// A date in the past means "retry now".
			let diff = time::OffsetDateTime::from(date) - time::OffsetDateTime::now_utc();
			diff.try_into().unwrap_or_default()
		}
		else {
			return Err(anyhow::anyhow!("could not parse retry-after header as delay-seconds or HTTP-date"));
		};

	Ok(retry_after.clamp(min, max))
}

pub struct DeserializableUri(pub Uri);

impl std::fmt::Debug for DeserializableUri {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl<'de> serde::Deserialize<'de> for DeserializableUri {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: serde::Deserializer<'de> {
		struct Visitor;

		impl serde::de::Visitor<'_> for Visitor {
			type Value = Uri;

			fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str("Uri")
			}

			fn visit_str<E>(self, s: &str) -> Result<Self::Value, E> where E: serde::de::Error {
				s.try_into().map_err(serde::de::Error::custom)
			}

			fn visit_string<E>(self, s: String) -> Result<Self::Value, E> where E: serde::de::Error {
				s.try_into().map_err(serde::de::Error::custom)
			}
		}

		Ok(DeserializableUri(deserializer.deserialize_string(Visitor)?))
	}
}
