use super::{Found, MaybeFound, Query, Resource, segment};

/// The kind of resource whose name is checked with [`super::Client::check_name_availability`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum NameAvailabilityType {
	Site,
	Slot,
	HostingEnvironment,
}

impl std::str::FromStr for NameAvailabilityType {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"Site" | "site" => NameAvailabilityType::Site,
			"Slot" | "slot" => NameAvailabilityType::Slot,
			"HostingEnvironment" | "hosting-environment" => NameAvailabilityType::HostingEnvironment,
			s => return Err(anyhow::anyhow!("unknown resource type {s:?}, expected one of Site, Slot, HostingEnvironment")),
		})
	}
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameAvailability {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name_available: Option<bool>,

	/// `Invalid` or `AlreadyExists`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

pub type TopLevelDomain = Resource<TopLevelDomainProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelDomainProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// Whether domains under this TLD can be registered with privacy protection.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub privacy: Option<bool>,
}

impl super::Client<'_> {
	pub async fn check_name_availability(&self, name: &str, r#type: NameAvailabilityType) -> anyhow::Result<NameAvailability> {
		#[derive(serde::Serialize)]
		struct Request<'a> {
			name: &'a str,
			r#type: NameAvailabilityType,
		}

		let query = Query::new(super::WEB_API_VERSION).finish();

		let availability =
			self.logger.report_operation(
				"azure/web/name",
				name,
				<log2::ScopedObjectOperation<'_>>::action("checknameavailability"),
				async {
					let Found(availability) =
						crate::request(
							self,
							http_common::Method::POST,
							format_args!("/providers/Microsoft.Web/checknameavailability{query}"),
							Some(&Request { name, r#type }),
						).await?;
					Ok::<_, anyhow::Error>(availability)
				},
			).await?;
		Ok(availability)
	}

	pub async fn top_level_domains_list(&self) -> anyhow::Result<Vec<TopLevelDomain>> {
		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let top_level_domains =
			self.logger.report_operation("azure/domain_registration/top_level_domains", self.subscription_id, <log2::ScopedObjectOperation<'_>>::Get, async {
				let top_level_domains = self.list(format_args!("/providers/Microsoft.DomainRegistration/topLevelDomains{query}")).await?;
				Ok::<_, anyhow::Error>(top_level_domains)
			}).await?;
		Ok(top_level_domains)
	}

	pub async fn top_level_domain_get(&self, name: &str) -> anyhow::Result<Option<TopLevelDomain>> {
		let name = segment("name", name)?;
		let query = Query::new(super::DOMAIN_REGISTRATION_API_VERSION).finish();

		let top_level_domain =
			self.logger.report_operation("azure/domain_registration/top_level_domain", name, <log2::ScopedObjectOperation<'_>>::Get, async {
				let MaybeFound(top_level_domain) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/providers/Microsoft.DomainRegistration/topLevelDomains/{name}{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(top_level_domain)
			}).await?;
		Ok(top_level_domain)
	}
}

#[cfg(test)]
mod tests {
	use super::{NameAvailability, NameAvailabilityType, TopLevelDomain};

	#[test]
	fn name_availability_type() {
		assert_eq!("Site".parse::<NameAvailabilityType>().unwrap(), NameAvailabilityType::Site);
		assert_eq!("hosting-environment".parse::<NameAvailabilityType>().unwrap(), NameAvailabilityType::HostingEnvironment);
		"Database".parse::<NameAvailabilityType>().unwrap_err();

		assert_eq!(serde_json::to_string(&NameAvailabilityType::HostingEnvironment).unwrap(), r#""HostingEnvironment""#);
	}

	#[test]
	fn name_availability() {
		let availability: NameAvailability =
			serde_json::from_str(r#"{"nameAvailable":false,"reason":"AlreadyExists","message":"Hostname 'site1' already exists."}"#).unwrap();
		assert_eq!(availability.name_available, Some(false));
		assert_eq!(availability.reason.as_deref(), Some("AlreadyExists"));
	}

	#[test]
	fn top_level_domain() {
		let top_level_domain: TopLevelDomain = serde_json::from_value(serde_json::json!({
			"id": "/subscriptions/sub/providers/Microsoft.DomainRegistration/topLevelDomains/com",
			"name": "com",
			"type": "Microsoft.DomainRegistration/topLevelDomains",
			"properties": { "privacy": true },
		})).unwrap();
		assert_eq!(top_level_domain.name.as_deref(), Some("com"));
		assert_eq!(top_level_domain.properties.privacy, Some(true));
	}
}
