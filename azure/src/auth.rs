use anyhow::Context;

pub enum Auth {
	ManagedIdentity {
		endpoint: String,
		identity_header: http_common::HeaderValue,
	},

	ServicePrincipal {
		client_id: String,
		client_secret: String,
		tenant_id: String,
	},
}

/// A token is refreshed this long before it expires, so that a request sent with it does not race its expiry.
const REFRESH_BEFORE_EXPIRY: time::Duration = time::Duration::minutes(5);

/// The `Authorization` header of a client, refreshed when its token is about to expire.
///
/// Long-running operations are polled for longer than a token's lifetime, so the header cannot be cached forever.
#[derive(Default)]
pub(crate) struct CachedAuthorization(tokio::sync::Mutex<Option<Authorization>>);

struct Authorization {
	header_value: http_common::HeaderValue,
	expires_on: Option<time::OffsetDateTime>,
}

impl CachedAuthorization {
	pub(crate) async fn get(
		&self,
		auth: &Auth,
		client: &http_common::Client,
		resource: &str,
		logger: &log2::Logger,
	) -> anyhow::Result<http_common::HeaderValue> {
		let mut cached = self.0.lock().await;

		if let Some(authorization) = &*cached {
			if authorization.is_fresh(time::OffsetDateTime::now_utc()) {
				return Ok(authorization.header_value.clone());
			}
		}

		let authorization = auth.get_authorization(client, resource, logger).await?;
		let header_value = authorization.header_value.clone();
		*cached = Some(authorization);
		Ok(header_value)
	}

	#[cfg(test)]
	pub(crate) fn with_header_value(header_value: http_common::HeaderValue) -> Self {
		CachedAuthorization(tokio::sync::Mutex::new(Some(Authorization { header_value, expires_on: None })))
	}
}

impl Authorization {
	fn is_fresh(&self, now: time::OffsetDateTime) -> bool {
		self.expires_on.is_none_or(|expires_on| now + REFRESH_BEFORE_EXPIRY < expires_on)
	}
}

impl Auth {
	async fn get_authorization(
		&self,
		client: &http_common::Client,
		resource: &str,
		logger: &log2::Logger,
	) -> anyhow::Result<Authorization> {
		#[derive(serde::Deserialize)]
		struct Response {
			access_token: String,
			token_type: String,
			#[serde(default)]
			expires_on: Option<ExpiresOn>,
		}

		impl http_common::FromResponse for Response {
			fn from_response(
				status: http_common::StatusCode,
				body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
				_headers: http_common::HeaderMap,
			) -> anyhow::Result<Option<Self>> {
				Ok(match (status, body) {
					(http_common::StatusCode::OK, Some(body)) => Some(body.as_json()?),
					_ => None,
				})
			}
		}

		let (log2::Secret(header_value), expires_on) = logger.report_operation("azure/authorization", resource, <log2::ScopedObjectOperation<'_>>::Get, async {
			let req = match self {
				Auth::ManagedIdentity { endpoint, identity_header } => {
					#[allow(clippy::declare_interior_mutable_const)] // Clippy doesn't like const http_common::HeaderName
					const X_IDENTITY_HEADER: http_common::HeaderName = http_common::HeaderName::from_static("x-identity-header");

					let query =
						form_urlencoded::Serializer::new(String::new())
						.append_pair("resource", resource)
						.append_pair("api-version", "2019-08-01")
						.finish();

					let mut req = http_common::Request::new(Default::default());
					*req.method_mut() = http_common::Method::GET;
					*req.uri_mut() =
						format!("{endpoint}?{query}")
						.try_into().context("could not construct authorization request URI")?;
					req.headers_mut().insert(X_IDENTITY_HEADER, identity_header.clone());
					req
				},

				Auth::ServicePrincipal { client_id, client_secret, tenant_id } => {
					#[allow(clippy::declare_interior_mutable_const)] // Clippy doesn't like const http_common::HeaderValue
					const APPLICATION_WWW_FORM_URLENCODED: http_common::HeaderValue = http_common::HeaderValue::from_static("application/x-www-form-urlencoded");

					let body =
						form_urlencoded::Serializer::new(String::new())
						.append_pair("grant_type", "client_credentials")
						.append_pair("client_id", client_id)
						.append_pair("client_secret", client_secret)
						.append_pair("resource", resource)
						.finish();
					let mut req = http_common::Request::new(body.into());
					*req.method_mut() = http_common::Method::POST;
					*req.uri_mut() =
						format!("https://login.microsoftonline.com/{tenant_id}/oauth2/token")
						.try_into().context("could not construct authorization request URI")?;
					req.headers_mut().insert(http_common::CONTENT_TYPE, APPLICATION_WWW_FORM_URLENCODED);
					req
				},
			};

			let Response { access_token, token_type, expires_on } = client.request(req).await.context("could not get authorization")?;

			let header_value =
				format!("{token_type} {access_token}")
				.try_into().context("could not parse token as HeaderValue")?;
			let expires_on = expires_on.map(ExpiresOn::timestamp).transpose()?;
			Ok::<_, anyhow::Error>((log2::Secret(header_value), expires_on))
		}).await?;
		Ok(Authorization { header_value, expires_on })
	}

	fn deserialize_with_env<'de, D>(
		identity_endpoint: Option<String>,
		identity_header: Option<String>,
		deserializer: D,
	) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(serde::Deserialize)]
		struct AuthInner {
			/// The application ID of the service principal that should be used to access Azure resources.
			///
			/// Only used when no managed identity is available.
			azure_client_id: String,

			/// The password of the service principal that should be used to access Azure resources.
			///
			/// Only used when no managed identity is available.
			azure_client_secret: String,

			/// The tenant ID of the service principal that should be used to access Azure resources.
			///
			/// Only used when no managed identity is available.
			azure_tenant_id: String,
		}

		if let (Some(endpoint), Some(identity_header)) = (identity_endpoint, identity_header) {
			let _ = deserializer;
			let identity_header =
				identity_header.try_into()
				.map_err(|err| serde::de::Error::custom(format!("could not parse IDENTITY_HEADER as HeaderValue: {err}")))?;
			return Ok(Auth::ManagedIdentity {
				endpoint,
				identity_header,
			});
		}

		let AuthInner { azure_client_id, azure_client_secret, azure_tenant_id } = serde::Deserialize::deserialize(deserializer)?;
		Ok(Auth::ServicePrincipal {
			client_id: azure_client_id,
			client_secret: azure_client_secret,
			tenant_id: azure_tenant_id,
		})
	}
}

impl<'de> serde::Deserialize<'de> for Auth {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: serde::Deserializer<'de> {
		Auth::deserialize_with_env(
			std::env::var("IDENTITY_ENDPOINT").ok(),
			std::env::var("IDENTITY_HEADER").ok(),
			deserializer,
		)
	}
}

/// The `expires_on` of a token response, in seconds since the Unix epoch.
/// Entra ID returns it as a string, and some managed identity endpoints return it as a number.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ExpiresOn {
	Number(i64),
	String(String),
}

impl ExpiresOn {
	fn timestamp(self) -> anyhow::Result<time::OffsetDateTime> {
		let timestamp = match self {
			ExpiresOn::Number(timestamp) => timestamp,
			ExpiresOn::String(timestamp) => timestamp.parse().with_context(|| format!("could not parse expires_on {timestamp:?}"))?,
		};
		let timestamp = time::OffsetDateTime::from_unix_timestamp(timestamp).context("expires_on is out of range")?;
		Ok(timestamp)
	}
}

impl std::fmt::Debug for Auth {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Auth::ManagedIdentity { endpoint, identity_header: _ } =>
				f.debug_struct("ManagedIdentity")
				.field("endpoint", endpoint)
				.field("identity_header", &log2::Secret(()))
				.finish(),

			Auth::ServicePrincipal { client_id, client_secret: _, tenant_id } =>
				f.debug_struct("ServicePrincipal")
				.field("client_id", client_id)
				.field("client_secret", &log2::Secret(()))
				.field("tenant_id", tenant_id)
				.finish(),
		}
	}
}
