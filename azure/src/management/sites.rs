//! Web apps, and their deployment slots.
//!
//! Every operation that takes a `slot` addresses the production site when it is `None`,
//! and the named deployment slot of the site otherwise.

use anyhow::Context;

use super::{Deleted, Done, Found, MaybeFound, NameValuePair, Query, Resource, Written, segment};

pub type Site = Resource<SiteProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteProperties {
	/// `Running` or `Stopped`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub host_names: Vec<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub repository_site_name: Option<String>,

	/// `Normal` or `Exceeded`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub usage_state: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub enabled_host_names: Vec<String>,

	/// `Normal`, `Limited` or `DisasterRecoveryMode`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub availability_state: Option<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub host_name_ssl_states: Vec<HostNameSslState>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server_farm_id: Option<String>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub last_modified_time_utc: Option<time::OffsetDateTime>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub site_config: Option<SiteConfig>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub traffic_manager_host_names: Vec<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scm_site_also_stopped: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target_swap_slot: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hosting_environment_profile: Option<super::HostingEnvironmentProfile>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_affinity_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_cert_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub host_names_disabled: Option<bool>,

	/// Comma-separated
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub outbound_ip_addresses: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub container_size: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_number_of_workers: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_group: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_default_container: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_host_name: Option<String>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNameSslState {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// `Disabled`, `SniEnabled` or `IpBasedEnabled`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ssl_state: Option<String>,

	#[serde(default, rename = "virtualIP", skip_serializing_if = "Option::is_none")]
	pub virtual_ip: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbprint: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_update: Option<bool>,
}

/// The `config/web` resource of a site.
pub type SiteConfigResource = Resource<SiteConfig>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub number_of_workers: Option<u32>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub default_documents: Vec<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub net_framework_version: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub php_version: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub python_version: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub node_version: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub java_version: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub java_container: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub java_container_version: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request_tracing_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub remote_debugging_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub http_logging_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detailed_error_logging_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logs_directory_size_limit: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub publishing_username: Option<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub app_settings: Vec<NameValuePair>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub connection_strings: Vec<ConnectionString>,

	#[serde(default, rename = "use32BitWorkerProcess", skip_serializing_if = "Option::is_none")]
	pub use_32_bit_worker_process: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub web_sockets_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub always_on: Option<bool>,

	/// `Integrated` or `Classic`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub managed_pipeline_mode: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub load_balancing: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_heal_enabled: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vnet_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_swap_slot_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub local_my_sql_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionString {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub connection_string: Option<log2::Secret<String>>,

	/// `MySql`, `SQLServer`, `SQLAzure` or `Custom`
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub r#type: Option<String>,
}

/// The `config/appsettings` resource of a site. Values are hidden from `Debug` output.
pub type AppSettings = Resource<std::collections::BTreeMap<String, log2::Secret<String>>>;

pub type HostNameBinding = Resource<HostNameBindingProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNameBindingProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub site_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain_id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub azure_resource_name: Option<String>,

	/// `Website` or `TrafficManager`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub azure_resource_type: Option<String>,

	/// `CName` or `A`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom_host_name_dns_record_type: Option<String>,

	/// `Verified` or `Managed`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub host_name_type: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct SiteCreateOrUpdateOptions {
	pub skip_dns_registration: Option<bool>,
	pub skip_custom_domain_verification: Option<bool>,
	pub force_dns_registration: Option<bool>,
	pub ttl_in_seconds: Option<u32>,
}

impl SiteCreateOrUpdateOptions {
	fn query(&self) -> String {
		let SiteCreateOrUpdateOptions { skip_dns_registration, skip_custom_domain_verification, force_dns_registration, ttl_in_seconds } = self;
		Query::new(super::WEB_API_VERSION)
			.append("skipDnsRegistration", *skip_dns_registration)
			.append("skipCustomDomainVerification", *skip_custom_domain_verification)
			.append("forceDnsRegistration", *force_dns_registration)
			.append("ttlInSeconds", *ttl_in_seconds)
			.finish()
	}
}

#[derive(Clone, Debug, Default)]
pub struct SiteDeleteOptions {
	pub delete_metrics: Option<bool>,

	/// Also delete the server farm if this was its last site.
	pub delete_empty_server_farm: Option<bool>,

	pub skip_dns_registration: Option<bool>,
}

impl SiteDeleteOptions {
	fn query(&self) -> String {
		let SiteDeleteOptions { delete_metrics, delete_empty_server_farm, skip_dns_registration } = self;
		Query::new(super::WEB_API_VERSION)
			.append("deleteMetrics", *delete_metrics)
			.append("deleteEmptyServerFarm", *delete_empty_server_farm)
			.append("skipDnsRegistration", *skip_dns_registration)
			.finish()
	}
}

/// The path of a site or of one of its slots.
#[derive(Clone, Copy)]
struct SitePath<'a> {
	resource_group_name: &'a str,
	name: &'a str,
	slot: Option<&'a str>,
}

impl<'a> SitePath<'a> {
	fn new(resource_group_name: &'a str, name: &'a str, slot: Option<&'a str>) -> anyhow::Result<Self> {
		Ok(SitePath {
			resource_group_name: segment("resource_group_name", resource_group_name)?,
			name: segment("name", name)?,
			slot: slot.map(|slot| segment("slot", slot)).transpose()?,
		})
	}

	fn id(self) -> (&'a str, &'a str, Option<&'a str>) {
		(self.resource_group_name, self.name, self.slot)
	}
}

impl std::fmt::Display for SitePath<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "/resourceGroups/{}/providers/Microsoft.Web/sites/{}", self.resource_group_name, self.name)?;
		if let Some(slot) = self.slot {
			write!(f, "/slots/{slot}")?;
		}
		Ok(())
	}
}

impl super::Client<'_> {
	/// `properties_to_include` is a comma-separated list of additional properties to return.
	pub async fn sites_list_by_resource_group(
		&self,
		resource_group_name: &str,
		properties_to_include: Option<&str>,
		include_slots: Option<bool>,
	) -> anyhow::Result<Vec<Site>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("propertiesToInclude", properties_to_include)
			.append("includeSlots", include_slots)
			.finish();

		let sites =
			self.logger.report_operation("azure/web/sites", resource_group_name, <log2::ScopedObjectOperation<'_>>::Get, async {
				let sites = self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/sites{query}")).await?;
				Ok::<_, anyhow::Error>(sites)
			}).await?;
		Ok(sites)
	}

	pub async fn site_get(&self, resource_group_name: &str, name: &str, slot: Option<&str>) -> anyhow::Result<Option<Site>> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let result =
			self.logger.report_operation("azure/web/site", site.id(), <log2::ScopedObjectOperation<'_>>::Get, async {
				let MaybeFound(result) = crate::request(self, http_common::Method::GET, format_args!("{site}{query}"), None::<&()>).await?;
				Ok::<_, anyhow::Error>(result)
			}).await?;
		Ok(result)
	}

	pub async fn site_create_or_update(
		&self,
		resource_group_name: &str,
		name: &str,
		slot: Option<&str>,
		site_envelope: &Site,
		options: &SiteCreateOrUpdateOptions,
	) -> anyhow::Result<Site> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = options.query();

		let result =
			self.logger.report_operation(
				"azure/web/site",
				site.id(),
				log2::ScopedObjectOperation::Create { value: format_args!("{site_envelope:?}") },
				async {
					let url = crate::make_uri(self, format_args!("{site}{query}"))?;
					let result: Option<Site> = self.long_running(http_common::Method::PUT, url, Some(site_envelope)).await?;
					let result = result.context("site creation completed without returning the site")?;
					Ok::<_, anyhow::Error>(result)
				},
			).await?;
		Ok(result)
	}

	pub async fn site_delete(&self, resource_group_name: &str, name: &str, slot: Option<&str>, options: &SiteDeleteOptions) -> anyhow::Result<()> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = options.query();

		self.logger.report_operation("azure/web/site", site.id(), <log2::ScopedObjectOperation<'_>>::Delete, async {
			let Deleted = crate::request(self, http_common::Method::DELETE, format_args!("{site}{query}"), None::<&()>).await?;
			Ok::<_, anyhow::Error>(())
		}).await?;
		Ok(())
	}

	pub async fn site_start(&self, resource_group_name: &str, name: &str, slot: Option<&str>) -> anyhow::Result<()> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();
		self.site_action(site, "start", &query).await
	}

	pub async fn site_stop(&self, resource_group_name: &str, name: &str, slot: Option<&str>) -> anyhow::Result<()> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();
		self.site_action(site, "stop", &query).await
	}

	/// A soft restart only restarts the worker processes. A synchronous restart blocks until the site has restarted.
	pub async fn site_restart(
		&self,
		resource_group_name: &str,
		name: &str,
		slot: Option<&str>,
		soft_restart: Option<bool>,
		synchronous: Option<bool>,
	) -> anyhow::Result<()> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("softRestart", soft_restart)
			.append("synchronous", synchronous)
			.finish();
		self.site_action(site, "restart", &query).await
	}

	async fn site_action(&self, site: SitePath<'_>, action: &str, query: &str) -> anyhow::Result<()> {
		self.logger.report_operation("azure/web/site", site.id(), <log2::ScopedObjectOperation<'_>>::action(action), async {
			let Done = crate::request(self, http_common::Method::POST, format_args!("{site}/{action}{query}"), None::<&()>).await?;
			Ok::<_, anyhow::Error>(())
		}).await?;
		Ok(())
	}

	pub async fn site_slots_list(&self, resource_group_name: &str, name: &str, properties_to_include: Option<&str>) -> anyhow::Result<Vec<Site>> {
		let site = SitePath::new(resource_group_name, name, None)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("propertiesToInclude", properties_to_include)
			.finish();

		let slots =
			self.logger.report_operation("azure/web/site/slots", site.id(), <log2::ScopedObjectOperation<'_>>::Get, async {
				let slots = self.list(format_args!("{site}/slots{query}")).await?;
				Ok::<_, anyhow::Error>(slots)
			}).await?;
		Ok(slots)
	}

	pub async fn site_config_get(&self, resource_group_name: &str, name: &str, slot: Option<&str>) -> anyhow::Result<SiteConfigResource> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let config =
			self.logger.report_operation("azure/web/site/config", site.id(), <log2::ScopedObjectOperation<'_>>::Get, async {
				let Found(config) = crate::request(self, http_common::Method::GET, format_args!("{site}/config/web{query}"), None::<&()>).await?;
				Ok::<_, anyhow::Error>(config)
			}).await?;
		Ok(config)
	}

	pub async fn site_config_update(
		&self,
		resource_group_name: &str,
		name: &str,
		slot: Option<&str>,
		config: &SiteConfigResource,
	) -> anyhow::Result<SiteConfigResource> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let config =
			self.logger.report_operation(
				"azure/web/site/config",
				site.id(),
				log2::ScopedObjectOperation::Update { value: format_args!("{config:?}") },
				async {
					let Written(config) =
						crate::request(self, http_common::Method::PUT, format_args!("{site}/config/web{query}"), Some(config)).await?;
					Ok::<_, anyhow::Error>(config)
				},
			).await?;
		Ok(config)
	}

	pub async fn site_app_settings_list(&self, resource_group_name: &str, name: &str, slot: Option<&str>) -> anyhow::Result<AppSettings> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let app_settings =
			self.logger.report_operation("azure/web/site/app_settings", site.id(), <log2::ScopedObjectOperation<'_>>::Get, async {
				let Found(app_settings) =
					crate::request(self, http_common::Method::POST, format_args!("{site}/config/appsettings/list{query}"), None::<&()>).await?;
				Ok::<_, anyhow::Error>(app_settings)
			}).await?;
		Ok(app_settings)
	}

	/// Replaces all app settings of the site.
	pub async fn site_app_settings_update(
		&self,
		resource_group_name: &str,
		name: &str,
		slot: Option<&str>,
		app_settings: &AppSettings,
	) -> anyhow::Result<AppSettings> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let app_settings =
			self.logger.report_operation(
				"azure/web/site/app_settings",
				site.id(),
				log2::ScopedObjectOperation::Update { value: format_args!("{app_settings:?}") },
				async {
					let Written(app_settings) =
						crate::request(self, http_common::Method::PUT, format_args!("{site}/config/appsettings{query}"), Some(app_settings)).await?;
					Ok::<_, anyhow::Error>(app_settings)
				},
			).await?;
		Ok(app_settings)
	}

	pub async fn site_host_name_bindings_list(&self, resource_group_name: &str, name: &str, slot: Option<&str>) -> anyhow::Result<Vec<HostNameBinding>> {
		let site = SitePath::new(resource_group_name, name, slot)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let bindings =
			self.logger.report_operation("azure/web/site/host_name_bindings", site.id(), <log2::ScopedObjectOperation<'_>>::Get, async {
				let bindings = self.list(format_args!("{site}/hostNameBindings{query}")).await?;
				Ok::<_, anyhow::Error>(bindings)
			}).await?;
		Ok(bindings)
	}
}

#[cfg(test)]
mod tests {
	use super::{AppSettings, Site, SiteConfigResource, SiteCreateOrUpdateOptions, SiteDeleteOptions, SitePath};

	#[test]
	fn site_path() {
		let site = SitePath::new("rg1", "site1", None).unwrap();
		assert_eq!(site.to_string(), "/resourceGroups/rg1/providers/Microsoft.Web/sites/site1");

		let site = SitePath::new("rg1", "site1", Some("staging")).unwrap();
		assert_eq!(site.to_string(), "/resourceGroups/rg1/providers/Microsoft.Web/sites/site1/slots/staging");
		assert_eq!(site.id(), ("rg1", "site1", Some("staging")));

		let err = SitePath::new("rg1", "site1", Some("")).err().unwrap();
		assert_eq!(err.to_string(), "slot is invalid: must not be empty");

		let err = SitePath::new("rg1", "site1?x=y", None).err().unwrap();
		assert_eq!(err.to_string(), "name is invalid: must not contain '?'");
	}

	#[test]
	fn options() {
		assert_eq!(SiteCreateOrUpdateOptions::default().query(), "?api-version=2015-08-01");

		let options = SiteCreateOrUpdateOptions {
			skip_dns_registration: Some(true),
			ttl_in_seconds: Some(300),
			..Default::default()
		};
		assert_eq!(options.query(), "?api-version=2015-08-01&skipDnsRegistration=true&ttlInSeconds=300");

		let options = SiteDeleteOptions {
			delete_metrics: Some(false),
			delete_empty_server_farm: Some(true),
			skip_dns_registration: None,
		};
		assert_eq!(options.query(), "?api-version=2015-08-01&deleteMetrics=false&deleteEmptyServerFarm=true");
	}

	#[test]
	fn site() {
		let site: Site = serde_json::from_value(serde_json::json!({
			"id": "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.Web/sites/site1/slots/staging",
			"name": "site1/staging",
			"type": "Microsoft.Web/sites/slots",
			"kind": "app",
			"location": "West US",
			"properties": {
				"state": "Running",
				"hostNames": ["site1-staging.azurewebsites.net"],
				"enabled": true,
				"hostNameSslStates": [
					{ "name": "site1-staging.azurewebsites.net", "sslState": "Disabled", "virtualIP": null, "toUpdate": null },
				],
				"serverFarmId": "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.Web/serverfarms/plan1",
				"lastModifiedTimeUtc": "2016-06-09T21:07:22.9633333",
				"siteConfig": null,
				"defaultHostName": "site1-staging.azurewebsites.net",
			},
		})).unwrap();
		assert_eq!(site.properties.state.as_deref(), Some("Running"));
		assert_eq!(site.properties.host_name_ssl_states[0].ssl_state.as_deref(), Some("Disabled"));
		assert!(site.properties.site_config.is_none());
		assert_eq!(site.properties.last_modified_time_utc.unwrap().year(), 2016);
	}

	#[test]
	fn site_config() {
		let config: SiteConfigResource = serde_json::from_value(serde_json::json!({
			"name": "web",
			"type": "Microsoft.Web/sites/config",
			"properties": {
				"numberOfWorkers": 1,
				"defaultDocuments": ["index.html"],
				"use32BitWorkerProcess": true,
				"alwaysOn": false,
				"connectionStrings": [
					{ "name": "db", "connectionString": "Server=db;Password=hunter2", "type": "SQLAzure" },
				],
			},
		})).unwrap();
		assert_eq!(config.properties.use_32_bit_worker_process, Some(true));
		assert_eq!(config.properties.connection_strings[0].r#type.as_deref(), Some("SQLAzure"));
		assert!(!format!("{config:?}").contains("hunter2"));

		let value = serde_json::to_value(&config.properties.connection_strings[0]).unwrap();
		assert_eq!(value["connectionString"], "Server=db;Password=hunter2");
	}

	#[test]
	fn app_settings() {
		let app_settings: AppSettings = serde_json::from_value(serde_json::json!({
			"name": "appsettings",
			"type": "Microsoft.Web/sites/config",
			"properties": { "WEBSITE_NODE_DEFAULT_VERSION": "6.9.1", "API_KEY": "hunter2" },
		})).unwrap();
		assert_eq!(app_settings.properties["API_KEY"].0, "hunter2");
		assert!(!format!("{app_settings:?}").contains("hunter2"));

		let value = serde_json::to_value(&app_settings).unwrap();
		assert_eq!(value["properties"]["WEBSITE_NODE_DEFAULT_VERSION"], "6.9.1");
	}

	#[tokio::test]
	async fn invalid_slot_fails_before_request() {
		let auth = super::super::test_auth();
		let logger = log2::Logger::new(None);
		let client = super::super::test_client(&auth, &logger);

		let err = client.site_restart("rg1", "site1", Some("a#b"), None, None).await.unwrap_err();
		assert_eq!(err.to_string(), "slot is invalid: must not contain '#'");
	}
}
