use super::{Deleted, Found, MaybeFound, Query, Resource, Written, segment};

pub type Certificate = Resource<CertificateProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub friendly_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subject_name: Option<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub host_names: Vec<String>,

	/// Base64-encoded PFX. Only sent on upload.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pfx_blob: Option<log2::Secret<String>>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<log2::Secret<String>>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub site_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub self_link: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub issuer: Option<String>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub issue_date: Option<time::OffsetDateTime>,

	#[serde(
		default,
		deserialize_with = "super::deserialize_timestamp",
		serialize_with = "time::serde::rfc3339::option::serialize",
		skip_serializing_if = "Option::is_none",
	)]
	pub expiration_date: Option<time::OffsetDateTime>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbprint: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub valid: Option<bool>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cer_blob: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public_key_hash: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hosting_environment_profile: Option<super::HostingEnvironmentProfile>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub key_vault_id: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub key_vault_secret_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server_farm_id: Option<String>,
}

/// A certificate signing request.
pub type Csr = Resource<CsrProperties>;

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub distinguished_name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub csr_string: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pfx_blob: Option<log2::Secret<String>>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<log2::Secret<String>>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public_key_hash: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hosting_environment: Option<String>,
}

impl super::Client<'_> {
	pub async fn certificates_list(&self) -> anyhow::Result<Vec<Certificate>> {
		let query = Query::new(super::WEB_API_VERSION).finish();

		let certificates =
			self.logger.report_operation("azure/web/certificates", self.subscription_id, <log2::ScopedObjectOperation<'_>>::Get, async {
				let certificates = self.list(format_args!("/providers/Microsoft.Web/certificates{query}")).await?;
				Ok::<_, anyhow::Error>(certificates)
			}).await?;
		Ok(certificates)
	}

	pub async fn certificates_list_by_resource_group(&self, resource_group_name: &str) -> anyhow::Result<Vec<Certificate>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let certificates =
			self.logger.report_operation("azure/web/certificates", resource_group_name, <log2::ScopedObjectOperation<'_>>::Get, async {
				let certificates =
					self.list(format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/certificates{query}")).await?;
				Ok::<_, anyhow::Error>(certificates)
			}).await?;
		Ok(certificates)
	}

	pub async fn certificate_get(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Option<Certificate>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let certificate =
			self.logger.report_operation("azure/web/certificate", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let MaybeFound(certificate) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/certificates/{name}{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(certificate)
			}).await?;
		Ok(certificate)
	}

	pub async fn certificate_create_or_update(
		&self,
		resource_group_name: &str,
		name: &str,
		certificate: &Certificate,
	) -> anyhow::Result<Certificate> {
		self.certificate_write(http_common::Method::PUT, resource_group_name, name, certificate).await
	}

	pub async fn certificate_update(
		&self,
		resource_group_name: &str,
		name: &str,
		certificate: &Certificate,
	) -> anyhow::Result<Certificate> {
		self.certificate_write(http_common::Method::PATCH, resource_group_name, name, certificate).await
	}

	async fn certificate_write(
		&self,
		method: http_common::Method,
		resource_group_name: &str,
		name: &str,
		certificate: &Certificate,
	) -> anyhow::Result<Certificate> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let value = format!("{certificate:?}");
		let operation =
			if method == http_common::Method::PUT {
				log2::ScopedObjectOperation::Create { value }
			}
			else {
				log2::ScopedObjectOperation::Update { value }
			};

		let certificate =
			self.logger.report_operation("azure/web/certificate", (resource_group_name, name), operation, async {
				let Written(certificate) =
					crate::request(
						self,
						method,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/certificates/{name}{query}"),
						Some(certificate),
					).await?;
				Ok::<_, anyhow::Error>(certificate)
			}).await?;
		Ok(certificate)
	}

	pub async fn certificate_delete(&self, resource_group_name: &str, name: &str) -> anyhow::Result<()> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		self.logger.report_operation("azure/web/certificate", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Delete, async {
			let Deleted =
				crate::request(
					self,
					http_common::Method::DELETE,
					format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/certificates/{name}{query}"),
					None::<&()>,
				).await?;
			Ok::<_, anyhow::Error>(())
		}).await?;
		Ok(())
	}

	pub async fn csrs_list(&self, resource_group_name: &str) -> anyhow::Result<Vec<Csr>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let csrs =
			self.logger.report_operation("azure/web/csrs", resource_group_name, <log2::ScopedObjectOperation<'_>>::Get, async {
				// The csrs collection is a bare array rather than a page.
				let Found(csrs) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/csrs{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(csrs)
			}).await?;
		Ok(csrs)
	}

	pub async fn csr_get(&self, resource_group_name: &str, name: &str) -> anyhow::Result<Option<Csr>> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let csr =
			self.logger.report_operation("azure/web/csr", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let MaybeFound(csr) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/csrs/{name}{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(csr)
			}).await?;
		Ok(csr)
	}

	pub async fn csr_create_or_update(&self, resource_group_name: &str, name: &str, csr: &Csr) -> anyhow::Result<Csr> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		let csr =
			self.logger.report_operation(
				"azure/web/csr",
				(resource_group_name, name),
				log2::ScopedObjectOperation::Create { value: format_args!("{csr:?}") },
				async {
					let Written(csr) =
						crate::request(
							self,
							http_common::Method::PUT,
							format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/csrs/{name}{query}"),
							Some(csr),
						).await?;
					Ok::<_, anyhow::Error>(csr)
				},
			).await?;
		Ok(csr)
	}

	pub async fn csr_delete(&self, resource_group_name: &str, name: &str) -> anyhow::Result<()> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let name = segment("name", name)?;
		let query = Query::new(super::WEB_API_VERSION).finish();

		self.logger.report_operation("azure/web/csr", (resource_group_name, name), <log2::ScopedObjectOperation<'_>>::Delete, async {
			let Deleted =
				crate::request(
					self,
					http_common::Method::DELETE,
					format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web/csrs/{name}{query}"),
					None::<&()>,
				).await?;
			Ok::<_, anyhow::Error>(())
		}).await?;
		Ok(())
	}
}
