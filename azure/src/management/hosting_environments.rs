//! App Service Environments. Creating or deleting one takes hours, so both are long-running operations.

use anyhow::Context;

use super::{Found, MaybeFound, NameValuePair, Page, PageBody, ProvisioningState, Query, Resource, segment};

pub type HostingEnvironment = Resource<HostingEnvironmentProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingEnvironmentProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub provisioning_state: Option<ProvisioningState>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<HostingEnvironmentStatus>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vnet_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vnet_resource_group_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vnet_subnet_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub virtual_network: Option<VirtualNetworkProfile>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub internal_load_balancing_mode: Option<InternalLoadBalancingMode>,

	/// Front-end VM size, eg `Medium`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub multi_size: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub multi_role_count: Option<u32>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub worker_pools: Vec<WorkerPool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ipssl_address_count: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dns_suffix: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub upgrade_domains: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subscription_id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_action: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_action_result: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub allowed_multi_sizes: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub allowed_worker_sizes: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub maximum_number_of_machines: Option<u32>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub vip_mappings: Vec<VirtualIpMapping>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub environment_capacities: Vec<StampCapacity>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment_is_healthy: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment_status: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_group: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub suspended: Option<bool>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub cluster_settings: Vec<NameValuePair>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum HostingEnvironmentStatus {
	Preparing,
	Ready,
	Scaling,
	Deleting,
	#[serde(other)]
	Unknown,
}

/// Which endpoints of the environment are exposed on the internal load balancer instead of a public VIP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum InternalLoadBalancingMode {
	None,
	Web,
	Publishing,
	#[serde(other)]
	Unknown,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkProfile {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub r#type: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subnet: Option<String>,
}

pub type WorkerPool = Resource<WorkerPoolProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPoolProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worker_size_id: Option<u32>,

	/// `Shared`, `Dedicated` or `Dynamic`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub compute_mode: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worker_size: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worker_count: Option<u32>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub instance_names: Vec<String>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StampCapacity {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub available_capacity: Option<i64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_capacity: Option<i64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub compute_mode: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worker_size: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worker_size_id: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exclude_from_capacity_allocation: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_applicable_for_all_compute_modes: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub site_mode: Option<String>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualIpMapping {
	#[serde(default, rename = "virtualIP", skip_serializing_if = "Option::is_none")]
	pub virtual_ip: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub internal_http_port: Option<u16>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub internal_https_port: Option<u16>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub in_use: Option<bool>,
}

/// The IP addresses of an environment.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_ip_address: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub internal_ip_address: Option<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub outbound_ip_addresses: Vec<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub vip_mappings: Vec<VirtualIpMapping>,
}

impl super::Client<'_> {
	pub async fn hosting_environments_list_by_resource_group(&self, resource_group_name: &str) -> anyhow::Result<Vec<HostingEnvironment>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let hosting_environments =
			self.logger.report_operation("azure/web/hosting_environments", resource_group_name, <log2::ScopedObjectOperation<'_>>::Get, async {
				let hosting_environments =
					self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments{query}")).await?;
				Ok::<_, anyhow::Error>(hosting_environments)
			}).await?;
		Ok(hosting_environments)
	}

	pub async fn hosting_environment_get(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Option<HostingEnvironment>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let hosting_environment =
			self.logger.report_operation("azure/web/hosting_environment", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let MaybeFound(hosting_environment) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(hosting_environment)
			}).await?;
		Ok(hosting_environment)
	}

	pub async fn hosting_environment_create_or_update(
		&self,
		resource_group_name: &str,
		name: &str,
		hosting_environment: &HostingEnvironment,
	) -> anyhow::Result<HostingEnvironment> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let hosting_environment =
			self.logger.report_operation(
				"azure/web/hosting_environment",
				(resource_group_name, name),
				log2::ScopedObjectOperation::Create { value: format_args!("{hosting_environment:?}") },
				async {
					let url = crate::make_uri(
						self,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}{query}"),
					)?;
					let hosting_environment: Option<HostingEnvironment> =
						self.long_running(http_common::Method::PUT, url, Some(hosting_environment)).await?;
					let hosting_environment = hosting_environment.context("hosting environment creation completed without returning the environment")?;
					Ok::<_, anyhow::Error>(hosting_environment)
				},
			).await?;
		Ok(hosting_environment)
	}

	/// `force_delete` also deletes the sites and server farms of the environment.
	pub async fn hosting_environment_delete(&self, resource_group_name: &str, name: &str, force_delete: Option<bool>) -> anyhow::Result<()> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("forceDelete", force_delete)
			.finish();

		self.logger.report_operation("azure/web/hosting_environment", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Delete, async {
			let url = crate::make_uri(
				self,
				format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}{query}"),
			)?;
			let _: Option<serde_json::Value> = self.long_running(http_common::Method::DELETE, url, None::<&()>).await?;
			Ok::<_, anyhow::Error>(())
		}).await?;
		Ok(())
	}

	pub async fn hosting_environment_capacities_list(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Vec<StampCapacity>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let capacities =
			self.logger.report_operation(
				"azure/web/hosting_environment/capacities",
				(resource_group_name, name),
				<log2::ScopedObjectOperation<'_>>::Get,
				async {
					let capacities =
						self.list(format_args!(
							"/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}/capacities/compute{query}",
						)).await?;
					Ok::<_, anyhow::Error>(capacities)
				},
			).await?;
		Ok(capacities)
	}

	pub async fn hosting_environment_vips_get(&self, resource_group_name: &str, name: &str) -> anyhow::Result<AddressResponse> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let addresses =
			self.logger.report_operation("azure/web/hosting_environment/vips", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let Found(addresses) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}/capacities/virtualip{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(addresses)
			}).await?;
		Ok(addresses)
	}

	/// Reboots all machines of the environment. The reboot itself happens asynchronously and is not awaited.
	pub async fn hosting_environment_reboot(&self, resource_group_name: &str, name: &str) -> anyhow::Result<()> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		self.logger.report_operation(
			"azure/web/hosting_environment",
			(resource_group_name, name),
			<log2::ScopedObjectOperation<'_>>::action("reboot"),
			async {
				let RebootAccepted =
					crate::request(
						self,
						http_common::Method::POST,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}/reboot{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(())
			},
		).await?;
		Ok(())
	}

	/// Suspends the environment. Returns the sites that were suspended with it.
	pub async fn hosting_environment_suspend(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Vec<super::Site>> {
		self.hosting_environment_suspend_or_resume(resource_group_name, name, "suspend").await
	}

	/// Resumes a suspended environment. Returns the sites that were resumed with it.
	pub async fn hosting_environment_resume(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Vec<super::Site>> {
		self.hosting_environment_suspend_or_resume(resource_group_name, name, "resume").await
	}

	async fn hosting_environment_suspend_or_resume(
		&self,
		resource_group_name: &str,
		name: &str,
		action: &str,
	) -> anyhow::Result<Vec<super::Site>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let sites =
			self.logger.report_operation(
				"azure/web/hosting_environment",
				(resource_group_name, name),
				<log2::ScopedObjectOperation<'_>>::action(action),
				async {
					let url = crate::make_uri(
						self,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}/{action}{query}"),
					)?;
					let page: Option<PageBody<super::Site>> = self.long_running(http_common::Method::POST, url, None::<&()>).await?;
					let sites = match page {
						Some(page) => {
							let page: Page<super::Site> = page.try_into()?;
							self.collect_pages(page).await?
						},
						None => vec![],
					};
					Ok::<_, anyhow::Error>(sites)
				},
			).await?;
		Ok(sites)
	}

	/// Gets the front-end pool of the environment.
	pub async fn hosting_environment_multi_role_pool_get(&self, resource_group_name: &str, name: &str) -> anyhow::Result<WorkerPool> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let multi_role_pool =
			self.logger.report_operation(
				"azure/web/hosting_environment/multi_role_pool",
				(resource_group_name, name),
				<log2::ScopedObjectOperation<'_>>::Get,
				async {
					let Found(multi_role_pool) =
						crate::request(
							self,
							http_common::Method::GET,
							format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}/multiRolePools/default{query}"),
							None::<&()>,
						).await?;
					Ok::<_, anyhow::Error>(multi_role_pool)
				},
			).await?;
		Ok(multi_role_pool)
	}

	pub async fn hosting_environment_worker_pools_list(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Vec<WorkerPool>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let worker_pools =
			self.logger.report_operation(
				"azure/web/hosting_environment/worker_pools",
				(resource_group_name, name),
				<log2::ScopedObjectOperation<'_>>::Get,
				async {
					let worker_pools =
						self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/hostingEnvironments/{name}/workerPools{query}")).await?;
					Ok::<_, anyhow::Error>(worker_pools)
				},
			).await?;
		Ok(worker_pools)
	}
}

/// A reboot is only ever accepted, never completed synchronously.
struct RebootAccepted;

impl http_common::FromResponse for RebootAccepted {
	fn from_response(
		status: http_common::StatusCode,
		_body: Option<&mut http_common::ResponseBody<impl std::io::Read>>,
		_headers: http_common::HeaderMap,
	) -> anyhow::Result<Option<Self>> {
		Ok(match status {
			http_common::StatusCode::ACCEPTED => Some(RebootAccepted),
			_ => None,
		})
	}
}
