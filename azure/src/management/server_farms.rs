use anyhow::Context;

use super::{Deleted, Done, MaybeFound, ProvisioningState, Query, Resource, segment};

/// An App Service plan.
pub type ServerFarm = Resource<ServerFarmProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerFarmProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worker_tier_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<ServerFarmStatus>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subscription: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub admin_site_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hosting_environment_profile: Option<super::HostingEnvironmentProfile>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub maximum_number_of_workers: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub geo_region: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub per_site_scaling: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub number_of_sites: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_group: Option<String>,

	/// Whether the plan hosts Linux workers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reserved: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target_worker_count: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target_worker_size_id: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub provisioning_state: Option<ProvisioningState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum ServerFarmStatus {
	Ready,
	Pending,
	Creating,
	#[serde(other)]
	Unknown,
}

/// A usage quota of a server farm, eg its file system storage.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit: Option<String>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub next_reset_time: Option<time::OffsetDateTime>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub current_value: Option<i64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub limit: Option<i64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<LocalizableString>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizableString {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub localized_value: Option<String>,
}

impl super::Client<'_> {
	pub async fn server_farms_list_by_resource_group(&self, resource_group_name: &str) -> anyhow::Result<Vec<ServerFarm>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let server_farms =
			self.logger.report_operation("azure/web/server_farms", resource_group_name, <log2::ScopedObjectOperation<'_>>::Get, async {
				let server_farms =
					self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/serverfarms{query}")).await?;
				Ok::<_, anyhow::Error>(server_farms)
			}).await?;
		Ok(server_farms)
	}

	pub async fn server_farm_get(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Option<ServerFarm>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let server_farm =
			self.logger.report_operation("azure/web/server_farm", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let MaybeFound(server_farm) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/serverfarms/{name}{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(server_farm)
			}).await?;
		Ok(server_farm)
	}

	/// `allow_pending_state` lets the call return while the plan is still being provisioned.
	pub async fn server_farm_create_or_update(
		&self,
		resource_group_name: &str,
		name: &str,
		server_farm: &ServerFarm,
		allow_pending_state: Option<bool>,
	) -> anyhow::Result<ServerFarm> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("allowPendingState", allow_pending_state)
			.finish();

		let server_farm =
			self.logger.report_operation(
				"azure/web/server_farm",
				(resource_group_name, name),
				log2::ScopedObjectOperation::Create { value: format_args!("{server_farm:?}") },
				async {
					let url = crate::make_uri(
						self,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/serverfarms/{name}{query}"),
					)?;
					let server_farm: Option<ServerFarm> = self.long_running(http_common::Method::PUT, url, Some(server_farm)).await?;
					let server_farm = server_farm.context("server farm creation completed without returning the server farm")?;
					Ok::<_, anyhow::Error>(server_farm)
				},
			).await?;
		Ok(server_farm)
	}

	pub async fn server_farm_delete(&self, resource_group_name: &str, name: &str) -> anyhow::Result<()> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		self.logger.report_operation("azure/web/server_farm", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Delete, async {
			let Deleted =
				crate::request(
					self,
					http_common::Method::DELETE,
					format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/serverfarms/{name}{query}"),
					None::<&()>,
				).await?;
			Ok::<_, anyhow::Error>(())
		}).await?;
		Ok(())
	}

	/// Lists the sites hosted by the server farm.
	pub async fn server_farm_sites_list(
		&self,
		resource_group_name: &str,
		name: &str,
		skip_token: Option<&str>,
		filter: Option<&str>,
		top: Option<&str>,
	) -> anyhow::Result<Vec<super::Site>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("$skipToken", skip_token)
			.append("$filter", filter)
			.append("$top", top)
			.finish();

		let sites =
			self.logger.report_operation("azure/web/server_farm/sites", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let sites =
					self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/serverfarms/{name}/sites{query}")).await?;
				Ok::<_, anyhow::Error>(sites)
			}).await?;
		Ok(sites)
	}

	/// Restarts all sites of the server farm. A soft restart only restarts the worker processes.
	pub async fn server_farm_restart_sites(&self, resource_group_name: &str, name: &str, soft_restart: Option<bool>) -> anyhow::Result<()> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("softRestart", soft_restart)
			.finish();

		self.logger.report_operation(
			"azure/web/server_farm",
			(resource_group_name, name),
			<log2::ScopedObjectOperation<'_>>::action("restartSites"),
			async {
				let Done =
					crate::request(
						self,
						http_common::Method::POST,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/serverfarms/{name}/restartSites{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(())
			},
		).await?;
		Ok(())
	}

	pub async fn server_farm_usages_list(&self, resource_group_name: &str, name: &str, filter: Option<&str>) -> anyhow::Result<Vec<Usage>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("$filter", filter)
			.finish();

		let usages =
			self.logger.report_operation("azure/web/server_farm/usages", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let usages =
					self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/serverfarms/{name}/usages{query}")).await?;
				Ok::<_, anyhow::Error>(usages)
			}).await?;
		Ok(usages)
	}
}

#[cfg(test)]
mod tests {
	use super::{ServerFarm, ServerFarmStatus, Usage};

	#[test]
	fn server_farm() {
		let server_farm: ServerFarm = serde_json::from_value(serde_json::json!({
			"id": "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.Web/serverfarms/plan1",
			"name": "plan1",
			"type": "Microsoft.Web/serverfarms",
			"kind": "app",
			"location": "West US",
			"sku": { "name": "S1", "tier": "Standard", "size": "S1", "family": "S", "capacity": 2 },
			"properties": {
				"status": "Ready",
				"maximumNumberOfWorkers": 10,
				"geoRegion": "West US",
				"numberOfSites": 3,
				"reserved": false,
			},
		})).unwrap();
		assert_eq!(server_farm.kind.as_deref(), Some("app"));
		assert_eq!(server_farm.sku.as_ref().unwrap().capacity, Some(2));
		assert_eq!(server_farm.properties.status, Some(ServerFarmStatus::Ready));
		assert_eq!(server_farm.properties.number_of_sites, Some(3));
	}

	#[test]
	fn new_server_farm() {
		let server_farm = ServerFarm {
			location: Some("West US".to_owned()),
			sku: Some(super::super::SkuDescription {
				name: Some("B1".to_owned()),
				capacity: Some(1),
				..Default::default()
			}),
			..Default::default()
		};
		let value = serde_json::to_value(&server_farm).unwrap();
		assert_eq!(value, serde_json::json!({
			"location": "West US",
			"sku": { "name": "B1", "capacity": 1 },
			"properties": {},
		}));
	}

	#[test]
	fn usage() {
		let usage: Usage = serde_json::from_str(
			r#"{"unit":"Bytes","nextResetTime":"9999-12-31T23:59:59.9999999Z","currentValue":1048576,"limit":53687091200,"name":{"value":"FileSystemStorage","localizedValue":"File System Storage"}}"#,
		).unwrap();
		assert_eq!(usage.current_value, Some(1_048_576));
		assert_eq!(usage.limit, Some(53_687_091_200));
		assert_eq!(usage.next_reset_time.unwrap().year(), 9999);
		assert_eq!(usage.name.unwrap().localized_value.as_deref(), Some("File System Storage"));
	}
}
