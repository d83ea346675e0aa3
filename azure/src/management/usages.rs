use super::{Found, Query, segment};

impl super::Client<'_> {
	/// Gets a batch of usage records of an App Service Environment, starting after `last_id`.
	///
	/// The records have no fixed schema, so they are returned as raw JSON.
	pub async fn usages_get(
		&self,
		resource_group_name: &str,
		environment_name: &str,
		last_id: Option<&str>,
		batch_size: Option<u32>,
	) -> anyhow::Result<serde_json::Value> {
		let resource_group_name = segment("resource_group_name", resource_group_name)?;
		let environment_name = segment("environment_name", environment_name)?;
		let query =
			Query::new(super::WEB_API_VERSION)
			.append("lastId", last_id)
			.append("batchSize", batch_size)
			.finish();

		let usages =
			self.logger.report_operation("azure/web/environment/usage", (resource_group_name, environment_name), <log2::ScopedObjectOperation<'_>>::Get, async {
				let Found(usages) =
					crate::request(
						self,
						http_common::Method::GET,
						format_args!("/resourceGroups/{resource_group_name}/providers/Microsoft.Web.Admin/environments/{environment_name}/usage{query}"),
						None::<&()>,
					).await?;
				Ok::<_, anyhow::Error>(usages)
			}).await?;
		Ok(usages)
	}
}
