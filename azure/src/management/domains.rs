use anyhow::Context;

use super::{Deleted, Found, MaybeFound, ProvisioningState, Query, Resource, segment};

pub type Domain = Resource<DomainProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contact_admin: Option<Contact>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contact_billing: Option<Contact>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contact_registrant: Option<Contact>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contact_tech: Option<Contact>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registration_status: Option<DomainRegistrationStatus>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub provisioning_state: Option<ProvisioningState>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub name_servers: Vec<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub privacy: Option<bool>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub created_time: Option<time::OffsetDateTime>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub expiration_time: Option<time::OffsetDateTime>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub last_renewed_time: Option<time::OffsetDateTime>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auto_renew: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ready_for_dns_record_management: Option<bool>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub managed_host_names: Vec<HostName>,

	/// Required when purchasing a domain.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub consent: Option<DomainPurchaseConsent>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub domain_not_renewable_reasons: Vec<String>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address_mailing: Option<Address>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fax: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub job_title: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name_first: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name_last: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name_middle: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub organization: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address1: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address2: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub postal_code: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum DomainRegistrationStatus {
	Active,
	Awaiting,
	Cancelled,
	Confiscated,
	Disabled,
	Excluded,
	Expired,
	Failed,
	Held,
	Locked,
	Parked,
	Pending,
	Reserved,
	Reverted,
	Suspended,
	Transferred,
	Unlocked,
	Unparked,
	Updated,
	#[serde(other)]
	Unknown,
}

/// A host name of a domain that is managed by the service.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostName {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub site_names: Vec<String>,

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

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPurchaseConsent {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub agreement_keys: Vec<String>,

	/// The client IP address of the user who agreed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub agreed_by: Option<String>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub agreed_at: Option<time::OffsetDateTime>,
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAvailability {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default)]
	pub available: bool,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain_type: Option<DomainType>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum DomainType {
	Regular,
	SoftDeleted,
	#[serde(other)]
	Unknown,
}

pub type DomainOwnershipIdentifier = Resource<DomainOwnershipIdentifierProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainOwnershipIdentifierProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ownership_id: Option<String>,
}

impl super::Client<'_> {
	pub async fn domains_list(&self) -> anyhow::Result<Vec<Domain>> {
		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let domains =
			self.logger.report_operation("azure/domain_registration/domains", self.subscription_id, <log2::ScopedObjectOperation<'_>>::Get, async {
				let domains = self.list(format_args!("/providers/Microsoft.DomainRegistration/domains{query}")).await?;
				Ok::<_, anyhow::Error>(domains)
			}).await?;
		Ok(domains)
	}

	pub async fn domains_list_by_resource_group(&self, resource_group_name: &str) -> anyhow::Result<Vec<Domain>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let domains =
			self.logger.report_operation("azure/domain_registration/domains", resource_group_name, <log2::ScopedObjectOperation<'_>>::Get, async {
				let domains =
					self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.DomainRegistration/domains{query}")).await?;
				Ok::<_, anyhow::Error>(domains)
			}).await?;
		Ok(domains)
	}

	pub async fn domain_get(&self, resource_group_name: &str, domain_name: &str) -> anyhow::Result<Option<Domain>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let domain_name = segment("domain_name", domain_name)?;
		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let domain =
			self.logger.report_operation("azure/domain_registration/domain", (resource_group_name, domain_name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let MaybeFound(domain) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.DomainRegistration/domains/{domain_name}{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(domain)
			}).await?;
		Ok(domain)
	}

	/// Registers a new domain, or updates an existing one. Registration is a long-running operation.
	pub async fn domain_create_or_update(&self, resource_group_name: &str, domain_name: &str, domain: &Domain) -> anyhow::Result<Domain> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let domain_name = segment("domain_name", domain_name)?;
		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let domain =
			self.logger.report_operation(
				"azure/domain_registration/domain",
				(resource_group_name, domain_name),
				log2::ScopedObjectOperation::Create { value: format_args!("{domain:?}") },
				async {
					let url = crate::make_uri(
						self,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.DomainRegistration/domains/{domain_name}{query}"),
					)?;
					let domain: Option<Domain> = self.long_running(http_common::Method::PUT, url, Some(domain)).await?;
					let domain = domain.context("domain registration completed without returning the domain")?;
					Ok::<_, anyhow::Error>(domain)
				},
			).await?;
		Ok(domain)
	}

	pub async fn domain_delete(
		&self,
		resource_group_name: &str,
		domain_name: &str,
		force_hard_delete_domain: Option<bool>,
	) -> anyhow::Result<()> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let domain_name = segment("domain_name", domain_name)?;
		let query =
			Query::new(super::DOMAIN_REGISTRATION_API_VERSION)
			.append("forceHardDeleteDomain", force_hard_delete_domain)
			.finish();

		self.logger.report_operation("azure/domain_registration/domain", (resource_group_name, domain_name), <log2::ScopedObjectOperation<'_>>::Delete, async {
			let Deleted =
				crate::request(
					self,
					http_common::Method::DELETE,
					format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.DomainRegistration/domains/{domain_name}{query}"),
					None::<&()>,
				).await?;
			Ok::<_, anyhow::Error>(())
		}).await?;
		Ok(())
	}

	pub async fn domain_check_availability(&self, name: &str) -> anyhow::Result<DomainAvailability> {
		#[derive(serde::Serialize)]
		struct Request<'a> {
			name: &'a str,
		}

		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let availability =
			self.logger.report_operation(
				"azure/domain_registration/domain",
				name,
				<log2::ScopedObjectOperation<'_>>::action("checkDomainAvailability"),
				async {
					let Found(availability) =
						crate::request(
							self,
							http_common::Method::POST,
							format_args!("/providers/Microsoft.DomainRegistration/checkDomainAvailability{query}"),
							Some(&Request { name }),
						).await?;
					Ok::<_, anyhow::Error>(availability)
				},
			).await?;
		Ok(availability)
	}

	pub async fn domain_ownership_identifiers_list(
		&self,
		resource_group_name: &str,
		domain_name: &str,
	) -> anyhow::Result<Vec<DomainOwnershipIdentifier>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let domain_name = segment("domain_name", domain_name)?;
		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let identifiers =
			self.logger.report_operation(
				"azure/domain_registration/domain/ownership_identifiers",
				(resource_group_name, domain_name),
				<log2::ScopedObjectOperation<'_>>::Get,
				async {
					let identifiers =
						self.list(format_args!(
							"/resourceGroups/{resource_group_name}/providers/Microsoft.DomainRegistration/domains/{domain_name}/domainOwnershipIdentifiers{query}",
						)).await?;
					Ok::<_, anyhow::Error>(identifiers)
				},
			).await?;
		Ok(identifiers)
	}
}
