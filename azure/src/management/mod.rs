//! Client for the App Service (Microsoft.Web) and domain registration (Microsoft.DomainRegistration) management APIs.
//!
//! Each resource group of the API is implemented as a set of `Client` methods in its own module.

use anyhow::Context;

mod certificates;
pub use certificates::{Certificate, CertificateProperties, Csr, CsrProperties};

mod domains;
pub use domains::{
	Address,
	Contact,
	Domain,
	DomainAvailability,
	DomainOwnershipIdentifier,
	DomainOwnershipIdentifierProperties,
	DomainProperties,
	DomainPurchaseConsent,
	DomainRegistrationStatus,
	DomainType,
	HostName,
};

mod global;
pub use global::{NameAvailability, NameAvailabilityType, TopLevelDomain, TopLevelDomainProperties};

mod hosting_environments;
pub use hosting_environments::{
	AddressResponse,
	HostingEnvironment,
	HostingEnvironmentProperties,
	HostingEnvironmentStatus,
	InternalLoadBalancingMode,
	StampCapacity,
	VirtualIpMapping,
	VirtualNetworkProfile,
	WorkerPool,
	WorkerPoolProperties,
};

mod long_running;

mod server_farms;
pub use server_farms::{LocalizableString, ServerFarm, ServerFarmProperties, ServerFarmStatus, Usage};

mod sites;
pub use sites::{
	AppSettings,
	ConnectionString,
	HostNameBinding,
	HostNameBindingProperties,
	HostNameSslState,
	Site,
	SiteConfig,
	SiteConfigResource,
	SiteCreateOrUpdateOptions,
	SiteDeleteOptions,
	SiteProperties,
};

#[cfg(test)]
mod test_server;

mod usages;

const WEB_API_VERSION: &str = "2015-08-01";
const DOMAIN_REGISTRATION_API_VERSION: &str = "2015-04-01";

pub struct Client<'a> {
	subscription_id: &'a str,
	auth: &'a crate::Auth,

	client: http_common::Client,
	cached_authorization: crate::CachedAuthorization,
	logger: &'a log2::Logger,
}

impl<'a> Client<'a> {
	pub fn new(
		subscription_id: &'a str,
		auth: &'a crate::Auth,
		user_agent: http_common::HeaderValue,
		logger: &'a log2::Logger,
	) -> anyhow::Result<Self> {
		let _ = segment("subscription_id", subscription_id)?;

		Ok(Client {
			subscription_id,
			auth,

			client: http_common::Client::new(user_agent).context("could not create HTTP client")?,
			cached_authorization: Default::default(),
			logger,
		})
	}

	/// Issues a GET for a paged collection and follows `nextLink` until the last page.
	fn list<T>(&self, path_and_query: std::fmt::Arguments<'_>) -> impl std::future::Future<Output = anyhow::Result<Vec<T>>> + '_
	where
		T: serde::de::DeserializeOwned + 'a,
	{
		let first_url = crate::make_uri(self, path_and_query);

		async move {
			let first_page = crate::request(self, http_common::Method::GET, first_url?, None::<&()>).await?;
			self.collect_pages(first_page).await
		}
	}

	async fn collect_pages<T>(&self, page: Page<T>) -> anyhow::Result<Vec<T>> where T: serde::de::DeserializeOwned {
		let Page { value: mut result, mut next_link } = page;

		while let Some(http_common::DeserializableUri(url)) = next_link {
			let page: Page<T> = crate::request(self, http_common::Method::GET, url, None::<&()>).await?;
			let Page { value, next_link: next_next_link } = page;
			result.extend(value);
			next_link = next_next_link;
		}

		Ok(result)
	}
}

impl crate::Client for Client<'_> {
	const AUTH_RESOURCE: &'static str = "https://management.azure.com";

	fn make_url(&self, path_and_query: std::fmt::Arguments<'_>) -> anyhow::Result<http_common::UriParts> {
		let mut url: http_common::UriParts = Default::default();
		url.scheme = Some(http_common::UriScheme::HTTPS);
		url.authority = Some(http_common::UriAuthority::from_static("management.azure.com"));
		url.path_and_query = Some(
			format!("/subscriptions/{}{path_and_query}", self.subscription_id)
			.try_into().context("could not parse request URL")?,
		);
		Ok(url)
	}

	fn request_parameters(&self) -> (
		&crate::Auth,
		&http_common::Client,
		&crate::CachedAuthorization,
		&log2::Logger,
	) {
		(
			self.auth,
			&self.client,
			&self.cached_authorization,
			self.logger,
		)
	}
}

/// The envelope shared by all tracked resources. Resource-specific fields live in `properties`.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Resource<P> {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub r#type: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,

	#[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
	pub tags: std::collections::BTreeMap<String, String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sku: Option<SkuDescription>,

	#[serde(default)]
	pub properties: P,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuDescription {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tier: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub family: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub capacity: Option<u32>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingEnvironmentProfile {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub r#type: Option<String>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct NameValuePair {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum ProvisioningState {
	Succeeded,
	Failed,
	Canceled,
	InProgress,
	Deleting,
	#[serde(other)]
	Unknown,
}

/// Validates a value that is interpolated into a URL path, eg a resource group or resource name.
fn segment<'a>(parameter: &str, value: &'a str) -> anyhow::Result<&'a str> {
	if value.is_empty() {
		return Err(anyhow::anyhow!("{parameter} is invalid: must not be empty"));
	}

	if value == "." || value == ".." {
		return Err(anyhow::anyhow!("{parameter} is invalid: must not be a relative path segment"));
	}

	if let Some(c) = value.chars().find(|&c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()) {
		return Err(anyhow::anyhow!("{parameter} is invalid: must not contain {c:?}"));
	}

	Ok(value)
}

/// The query string of a request. Always starts with `api-version`; optional parameters are only appended when set.
struct Query(form_urlencoded::Serializer<'static, String>);

impl Query {
	fn new(api_version: &str) -> Self {
		let mut serializer = form_urlencoded::Serializer::for_suffix(String::from("?"), 1);
		serializer.append_pair("api-version", api_version);
		Query(serializer)
	}

	fn append(mut self, name: &str, value: Option<impl std::fmt::Display>) -> Self {
		if let Some(value) = value {
			self.0.append_pair(name, &value.to_string());
		}
		self
	}

	fn finish(mut self) -> String {
		self.0.finish()
	}
}

/// A page of a collection, as returned by list operations.
struct Page<T> {
	value: Vec<T>,
	next_link: Option<http_common::DeserializableUri>,
}

/// The wire form of [`Page`]. Also the result of long-running operations that return a collection.
#[derive(serde::Deserialize)]
#[serde(bound = "T: serde::de::DeserializeOwned")]
struct PageBody<T> {
	#[serde(default = "Vec::new")]
	value: Vec<T>,

	#[serde(default, rename = "nextLink")]
	next_link: Option<String>,
}

impl<T> TryFrom<PageBody<T>> for Page<T> {
	type Error = anyhow::Error;

	fn try_from(PageBody { value, next_link }: PageBody<T>) -> Result<Self, Self::Error> {
		let next_link = match next_link {
			Some(next_link) if !next_link.is_empty() =>
				Some(http_common::DeserializableUri(next_link.try_into().context("could not parse nextLink")?)),
			_ => None,
		};
		Ok(Page { value, next_link })
	}
}

impl<T> http_common::FromResponse for Page<T> where T: serde::de::DeserializeOwned {
	fn from_response(
		status: http_common::StatusCode,
		body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match (status, body) {
			(http_common::StatusCode::OK, Some(body)) => {
				let body: PageBody<T> = body.as_json()?;
				Some(body.try_into()?)
			},
			_ => None,
		})
	}
}

/// A resource that must exist. Only `200 OK` with a JSON body is expected.
struct Found<T>(T);

impl<T> http_common::FromResponse for Found<T> where T: serde::de::DeserializeOwned {
	fn from_response(
		status: http_common::StatusCode,
		body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match (status, body) {
			(http_common::StatusCode::OK, Some(body)) => Some(Found(body.as_json()?)),
			_ => None,
		})
	}
}

/// The result of a PUT or PATCH, which answers `201 Created` for new resources.
struct Written<T>(T);

impl<T> http_common::FromResponse for Written<T> where T: serde::de::DeserializeOwned {
	fn from_response(
		status: http_common::StatusCode,
		body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match (status, body) {
			(http_common::StatusCode::OK | http_common::StatusCode::CREATED, Some(body)) => Some(Written(body.as_json()?)),
			_ => None,
		})
	}
}

/// A resource that may not exist. `404 Not Found` becomes `None`.
struct MaybeFound<T>(Option<T>);

impl<T> http_common::FromResponse for MaybeFound<T> where T: serde::de::DeserializeOwned {
	fn from_response(
		status: http_common::StatusCode,
		body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match (status, body) {
			(http_common::StatusCode::OK, Some(body)) => Some(MaybeFound(Some(body.as_json()?))),
			(http_common::StatusCode::NOT_FOUND, _) => Some(MaybeFound(None)),
			_ => None,
		})
	}
}

/// A bodyless success of a delete. A resource that is already gone counts as deleted.
struct Deleted;

impl http_common::FromResponse for Deleted {
	fn from_response(
		status: http_common::StatusCode,
		_body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match status {
			http_common::StatusCode::OK |
			http_common::StatusCode::NO_CONTENT |
			http_common::StatusCode::NOT_FOUND => Some(Deleted),
			_ => None,
		})
	}
}

/// A bodyless success of an action such as start or stop.
struct Done;

impl http_common::FromResponse for Done {
	fn from_response(
		status: http_common::StatusCode,
		_body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match status {
			http_common::StatusCode::OK |
			http_common::StatusCode::NO_CONTENT => Some(Done),
			_ => None,
		})
	}
}

/// Lenient timestamp deserializer. The API returns both RFC 3339 timestamps and timestamps without an offset,
/// which are in UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<time::OffsetDateTime>, D::Error> where D: serde::Deserializer<'de> {
	struct Visitor;

	impl<'de> serde::de::Visitor<'de> for Visitor {
		type Value = Option<time::OffsetDateTime>;

		fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			f.write_str("timestamp")
		}

		fn visit_none<E>(self) -> Result<Self::Value, E> where E: serde::de::Error {
			Ok(None)
		}

		fn visit_unit<E>(self) -> Result<Self::Value, E> where E: serde::de::Error {
			Ok(None)
		}

		fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error> where D: serde::Deserializer<'de> {
			deserializer.deserialize_str(self)
		}

		fn visit_str<E>(self, s: &str) -> Result<Self::Value, E> where E: serde::de::Error {
			const WITHOUT_OFFSET: &[time::format_description::BorrowedFormatItem<'_>] =
				time::macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

			if let Ok(timestamp) = time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339) {
				return Ok(Some(timestamp));
			}

			let timestamp = time::PrimitiveDateTime::parse(s, WITHOUT_OFFSET).map_err(serde::de::Error::custom)?;
			Ok(Some(timestamp.assume_utc()))
		}
	}

	deserializer.deserialize_option(Visitor)
}

#[cfg(test)]
fn test_client<'a>(auth: &'a crate::Auth, logger: &'a log2::Logger) -> Client<'a> {
	Client::new("00000000-0000-0000-0000-000000000000", auth, http_common::HeaderValue::from_static("azure-web-test"), logger).unwrap()
}

/// A client whose requests carry a fixed authorization, for tests that talk to a [`test_server::TestServer`].
#[cfg(test)]
fn test_client_authorized<'a>(auth: &'a crate::Auth, logger: &'a log2::Logger) -> Client<'a> {
	let mut client = test_client(auth, logger);
	client.cached_authorization = crate::CachedAuthorization::with_header_value(http_common::HeaderValue::from_static("Bearer eyJ0eXAi"));
	client
}

#[cfg(test)]
fn test_auth() -> crate::Auth {
	crate::Auth::ServicePrincipal {
		client_id: "00000000-0000-0000-0000-000000000001".to_owned(),
		client_secret: "hunter2".to_owned(),
		tenant_id: "00000000-0000-0000-0000-000000000002".to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::Resource;

	#[test]
	fn segment_validation() {
		assert_eq!(super::segment("name", "site-1.prod_(eu)").unwrap(), "site-1.prod_(eu)");

		let err = super::segment("resource_group_name", "").unwrap_err();
		assert_eq!(err.to_string(), "resource_group_name is invalid: must not be empty");

		for invalid in ["a/b", "a?b", "a#b", "a%2Fb", "a b", "a\nb"] {
			super::segment("name", invalid).unwrap_err();
		}

		let err = super::segment("name", "..").unwrap_err();
		assert_eq!(err.to_string(), "name is invalid: must not be a relative path segment");
		super::segment("name", ".").unwrap_err();
		assert_eq!(super::segment("name", "...").unwrap(), "...");
		assert_eq!(super::segment("name", ".well-known").unwrap(), ".well-known");
	}

	#[test]
	fn query() {
		let query = super::Query::new(super::WEB_API_VERSION).finish();
		assert_eq!(query, "?api-version=2015-08-01");

		let query =
			super::Query::new(super::WEB_API_VERSION)
			.append("softRestart", Some(true))
			.append("synchronous", None::<bool>)
			.append("$filter", Some("name eq 'a&b'"))
			.finish();
		assert_eq!(query, "?api-version=2015-08-01&softRestart=true&%24filter=name+eq+%27a%26b%27");
	}

	#[test]
	fn resource_envelope() {
		#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
		struct Properties {
			state: Option<String>,
		}

		let resource: Resource<Properties> = serde_json::from_value(serde_json::json!({
			"id": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Web/sites/site1",
			"name": "site1",
			"type": "Microsoft.Web/sites",
			"location": "West US",
			"tags": { "env": "prod" },
			"unknownField": 5,
			"properties": { "state": "Running" },
		})).unwrap();
		assert_eq!(resource.name.as_deref(), Some("site1"));
		assert_eq!(resource.r#type.as_deref(), Some("Microsoft.Web/sites"));
		assert_eq!(resource.tags["env"], "prod");
		assert_eq!(resource.properties.state.as_deref(), Some("Running"));

		let resource: Resource<Properties> = Resource {
			location: Some("West US".to_owned()),
			..Default::default()
		};
		let value = serde_json::to_value(&resource).unwrap();
		assert_eq!(value, serde_json::json!({ "location": "West US", "properties": { "state": null } }));
	}

	#[test]
	fn provisioning_state() {
		let state: super::ProvisioningState = serde_json::from_str(r#""Succeeded""#).unwrap();
		assert_eq!(state, super::ProvisioningState::Succeeded);

		let state: super::ProvisioningState = serde_json::from_str(r#""Migrating""#).unwrap();
		assert_eq!(state, super::ProvisioningState::Unknown);
	}

	#[test]
	fn timestamps() {
		#[derive(Debug, serde::Deserialize)]
		struct Value {
			#[serde(default, deserialize_with = "super::deserialize_timestamp")]
			timestamp: Option<time::OffsetDateTime>,
		}

		let Value { timestamp } = serde_json::from_str(r#"{"timestamp":"2016-06-09T21:07:22.9633333"}"#).unwrap();
		let timestamp = timestamp.unwrap();
		assert_eq!(timestamp.offset(), time::UtcOffset::UTC);
		assert_eq!((timestamp.year(), timestamp.hour(), timestamp.second()), (2016, 21, 22));

		let Value { timestamp } = serde_json::from_str(r#"{"timestamp":"2017-01-01T00:00:00+02:00"}"#).unwrap();
		assert_eq!(timestamp.unwrap().offset().whole_hours(), 2);

		let Value { timestamp } = serde_json::from_str(r#"{"timestamp":null}"#).unwrap();
		assert!(timestamp.is_none());

		let Value { timestamp } = serde_json::from_str("{}").unwrap();
		assert!(timestamp.is_none());

		serde_json::from_str::<Value>(r#"{"timestamp":"yesterday"}"#).unwrap_err();
	}

	#[tokio::test]
	async fn collect_pages_follows_next_link() {
		let auth = super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::test_client_authorized(&auth, &logger);

		let mut server = super::test_server::TestServer::bind().await;
		server.serve(vec![
			super::test_server::TestResponse::new(http_common::StatusCode::OK)
				.json(serde_json::json!({ "value": [{ "name": "b" }, { "name": "c" }], "nextLink": server.url("/page3?$skiptoken=2").to_string() })),
			super::test_server::TestResponse::new(http_common::StatusCode::OK)
				.json(serde_json::json!({ "value": [{ "name": "d" }], "nextLink": "" })),
		]);

		let first_page = super::Page {
			value: vec![Resource::<serde_json::Value> { name: Some("a".to_owned()), ..Default::default() }],
			next_link: Some(http_common::DeserializableUri(server.url("/page2?$skiptoken=1"))),
		};
		let resources = client.collect_pages(first_page).await.unwrap();
		let names: Vec<_> = resources.iter().map(|resource| resource.name.as_deref().unwrap()).collect();
		assert_eq!(names, ["a", "b", "c", "d"]);
		assert_eq!(server.requests(), ["GET /page2", "GET /page3"]);
	}

	#[tokio::test]
	async fn collect_pages_fails_on_error_page() {
		let auth = super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::test_client_authorized(&auth, &logger);

		let mut server = super::test_server::TestServer::bind().await;
		server.serve(vec![
			super::test_server::TestResponse::new(http_common::StatusCode::INTERNAL_SERVER_ERROR)
				.json(serde_json::json!({ "error": { "code": "InternalServerError", "message": "Try again later." } })),
		]);

		let first_page: super::Page<Resource<serde_json::Value>> = super::Page {
			value: vec![],
			next_link: Some(http_common::DeserializableUri(server.url("/page2"))),
		};
		let err = client.collect_pages(first_page).await.unwrap_err();
		assert_eq!(err.to_string(), "InternalServerError: Try again later.");
	}

	#[test]
	fn page() {
		let mut body = http_common::ResponseBody::new(
			http_common::HeaderValue::from_static("application/json"),
			&br#"{"value":[{"name":"a"},{"name":"b"}],"nextLink":"https://management.azure.com/subscriptions/sub/providers/Microsoft.Web/sites?api-version=2015-08-01&$skiptoken=abc"}"#[..],
		);
		let super::Page { value, next_link }: super::Page<Resource<serde_json::Value>> =
			http_common::FromResponse::from_response(http_common::StatusCode::OK, Some(&mut body), Default::default()).unwrap().unwrap();
		assert_eq!(value.len(), 2);
		assert_eq!(value[1].name.as_deref(), Some("b"));
		assert_eq!(next_link.unwrap().0.query(), Some("api-version=2015-08-01&$skiptoken=abc"));

		let mut body = http_common::ResponseBody::new(http_common::HeaderValue::from_static("application/json"), &br#"{"value":[],"nextLink":null}"#[..]);
		let super::Page { value, next_link }: super::Page<Resource<serde_json::Value>> =
			http_common::FromResponse::from_response(http_common::StatusCode::OK, Some(&mut body), Default::default()).unwrap().unwrap();
		assert!(value.is_empty());
		assert!(next_link.is_none());
	}

	#[test]
	fn deleted_and_done() {
		for status in [http_common::StatusCode::OK, http_common::StatusCode::NO_CONTENT, http_common::StatusCode::NOT_FOUND] {
			let deleted: Option<super::Deleted> = http_common::FromResponse::from_response(status, None::<&mut http_common::ResponseBody<std::io::Empty>>, Default::default()).unwrap();
			assert!(deleted.is_some());
		}

		let written: Option<super::Written<serde_json::Value>> = http_common::FromResponse::from_response(
			http_common::StatusCode::CREATED,
			Some(&mut http_common::ResponseBody::new(http_common::HeaderValue::from_static("application/json"), &br#"{"name":"a"}"#[..])),
			Default::default(),
		).unwrap();
		assert_eq!(written.unwrap().0["name"], "a");

		let done: Option<super::Done> = http_common::FromResponse::from_response(http_common::StatusCode::NOT_FOUND, None::<&mut http_common::ResponseBody<std::io::Empty>>, Default::default()).unwrap();
		assert!(done.is_none());
	}
}
