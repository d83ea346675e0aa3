use anyhow::Context;

const USAGE: &str = "\
usage: azure-web <command>

commands:
    sites list [<resource-group>]
    sites get <resource-group> <name> [<slot>]
    sites start|stop|restart <resource-group> <name> [<slot>]
    server-farms list [<resource-group>]
    certificates list [<resource-group>]
    domains list [<resource-group>]
    hosting-environments list [<resource-group>]
    usages get <resource-group> <environment> [<last-id>] [<batch-size>]
    check-name <name> Site|Slot|HostingEnvironment

Settings are read as JSON from the AZURE_WEB_SETTINGS env var.";

fn main() -> anyhow::Result<std::process::ExitCode> {
	log::set_logger(&GlobalLogger).context("could not set global logger")?;
	log::set_max_level(log::LevelFilter::Info);

	let logger = log2::Logger::new(std::env::var("AZURE_WEB_INVOCATION_ID").ok());

	let command = match Command::parse(std::env::args().skip(1)) {
		Ok(command) => command,
		Err(err) => {
			eprintln!("{err}\n\n{USAGE}");
			return Ok(std::process::ExitCode::from(2));
		},
	};

	match run_main(command, &logger) {
		Ok(()) => Ok(std::process::ExitCode::SUCCESS),
		Err(err) => {
			logger.report_error(&err);
			Ok(std::process::ExitCode::FAILURE)
		},
	}
}

fn run_main(command: Command, logger: &log2::Logger) -> anyhow::Result<()> {
	let settings = std::env::var("AZURE_WEB_SETTINGS").context("could not read AZURE_WEB_SETTINGS env var")?;
	let settings: Settings = serde_json::from_str(&settings).context("could not parse AZURE_WEB_SETTINGS env var")?;

	let runtime =
		tokio::runtime::Builder::new_current_thread()
		.enable_io()
		.enable_time()
		.build()
		.context("could not create tokio runtime")?;
	runtime.block_on(run(command, settings, logger))
}

async fn run(command: Command, settings: Settings, logger: &log2::Logger) -> anyhow::Result<()> {
	let Settings { azure_subscription_id, azure_resource_group_name, azure_auth } = settings;

	let client =
		azure::management::Client::new(
			&azure_subscription_id,
			&azure_auth,
			http_common::HeaderValue::from_static(concat!("azure-web ", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))),
			logger,
		).context("could not initialize Azure Management API client")?;

	let required_resource_group_name = |resource_group_name: Option<String>| {
		resource_group_name
			.or_else(|| azure_resource_group_name.clone())
			.context("no resource group given on the command line or in azure_resource_group_name")
	};

	match command {
		Command::SitesList { resource_group_name } => {
			let resource_group_name = required_resource_group_name(resource_group_name)?;
			let sites = client.sites_list_by_resource_group(&resource_group_name, None, None).await?;
			print(&sites)?;
		},

		Command::SiteGet { resource_group_name, name, slot } => {
			let site =
				client.site_get(&resource_group_name, &name, slot.as_deref()).await?
				.with_context(|| format!("site {resource_group_name}/{name} does not exist"))?;
			print(&site)?;
		},

		Command::SiteAction { action, resource_group_name, name, slot } => match action {
			SiteAction::Start => client.site_start(&resource_group_name, &name, slot.as_deref()).await?,
			SiteAction::Stop => client.site_stop(&resource_group_name, &name, slot.as_deref()).await?,
			SiteAction::Restart => client.site_restart(&resource_group_name, &name, slot.as_deref(), None, None).await?,
		},

		Command::ServerFarmsList { resource_group_name } => {
			let resource_group_name = required_resource_group_name(resource_group_name)?;
			let server_farms = client.server_farms_list_by_resource_group(&resource_group_name).await?;
			print(&server_farms)?;
		},

		Command::CertificatesList { resource_group_name } => {
			let certificates = match resource_group_name.or(azure_resource_group_name.clone()) {
				Some(resource_group_name) => client.certificates_list_by_resource_group(&resource_group_name).await?,
				None => client.certificates_list().await?,
			};
			print(&certificates)?;
		},

		Command::DomainsList { resource_group_name } => {
			let domains = match resource_group_name.or(azure_resource_group_name.clone()) {
				Some(resource_group_name) => client.domains_list_by_resource_group(&resource_group_name).await?,
				None => client.domains_list().await?,
			};
			print(&domains)?;
		},

		Command::HostingEnvironmentsList { resource_group_name } => {
			let resource_group_name = required_resource_group_name(resource_group_name)?;
			let hosting_environments = client.hosting_environments_list_by_resource_group(&resource_group_name).await?;
			print(&hosting_environments)?;
		},

		Command::UsagesGet { resource_group_name, environment_name, last_id, batch_size } => {
			let usages = client.usages_get(&resource_group_name, &environment_name, last_id.as_deref(), batch_size).await?;
			print(&usages)?;
		},

		Command::CheckName { name, r#type } => {
			let availability = client.check_name_availability(&name, r#type).await?;
			print(&availability)?;
		},
	}

	Ok(())
}

fn print(value: &impl serde::Serialize) -> anyhow::Result<()> {
	let mut stdout = std::io::stdout().lock();
	serde_json::to_writer_pretty(&mut stdout, value).context("could not write output")?;
	std::io::Write::write_all(&mut stdout, b"\n").context("could not write output")?;
	Ok(())
}

#[derive(serde::Deserialize)]
struct Settings {
	/// The Azure subscription ID.
	azure_subscription_id: String,

	/// The resource group used by commands whose resource group is not given on the command line.
	#[serde(default)]
	azure_resource_group_name: Option<String>,

	/// The Azure authentication credentials.
	///
	/// Defaults to parsing `azure::Auth::ManagedIdentity` from the environment.
	/// If not found, then falls back to parsing a service principal from this JSON object's
	/// `{ azure_client_id: String, azure_client_secret: String, azure_tenant_id: String }` properties.
	#[serde(flatten)]
	azure_auth: azure::Auth,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
	SitesList { resource_group_name: Option<String> },
	SiteGet { resource_group_name: String, name: String, slot: Option<String> },
	SiteAction { action: SiteAction, resource_group_name: String, name: String, slot: Option<String> },
	ServerFarmsList { resource_group_name: Option<String> },
	CertificatesList { resource_group_name: Option<String> },
	DomainsList { resource_group_name: Option<String> },
	HostingEnvironmentsList { resource_group_name: Option<String> },
	UsagesGet { resource_group_name: String, environment_name: String, last_id: Option<String>, batch_size: Option<u32> },
	CheckName { name: String, r#type: azure::management::NameAvailabilityType },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SiteAction {
	Start,
	Stop,
	Restart,
}

impl Command {
	fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
		let args: Vec<String> = args.into_iter().collect();
		let args: Vec<&str> = args.iter().map(String::as_str).collect();

		let owned = |s: &str| s.to_owned();

		Ok(match args[..] {
			["sites", "list", ref resource_group_name @ ..] if resource_group_name.len() <= 1 =>
				Command::SitesList { resource_group_name: resource_group_name.first().copied().map(owned) },

			["sites", "get", resource_group_name, name, ref slot @ ..] if slot.len() <= 1 =>
				Command::SiteGet {
					resource_group_name: resource_group_name.to_owned(),
					name: name.to_owned(),
					slot: slot.first().copied().map(owned),
				},

			["sites", action @ ("start" | "stop" | "restart"), resource_group_name, name, ref slot @ ..] if slot.len() <= 1 =>
				Command::SiteAction {
					action: match action {
						"start" => SiteAction::Start,
						"stop" => SiteAction::Stop,
						_ => SiteAction::Restart,
					},
					resource_group_name: resource_group_name.to_owned(),
					name: name.to_owned(),
					slot: slot.first().copied().map(owned),
				},

			["server-farms", "list", ref resource_group_name @ ..] if resource_group_name.len() <= 1 =>
				Command::ServerFarmsList { resource_group_name: resource_group_name.first().copied().map(owned) },

			["certificates", "list", ref resource_group_name @ ..] if resource_group_name.len() <= 1 =>
				Command::CertificatesList { resource_group_name: resource_group_name.first().copied().map(owned) },

			["domains", "list", ref resource_group_name @ ..] if resource_group_name.len() <= 1 =>
				Command::DomainsList { resource_group_name: resource_group_name.first().copied().map(owned) },

			["hosting-environments", "list", ref resource_group_name @ ..] if resource_group_name.len() <= 1 =>
				Command::HostingEnvironmentsList { resource_group_name: resource_group_name.first().copied().map(owned) },

			["usages", "get", resource_group_name, environment_name, ref rest @ ..] if rest.len() <= 2 => {
				let last_id = rest.first().copied().map(owned);
				let batch_size =
					rest.get(1)
					.map(|batch_size| batch_size.parse().with_context(|| format!("could not parse batch size {batch_size:?}")))
					.transpose()?;
				Command::UsagesGet {
					resource_group_name: resource_group_name.to_owned(),
					environment_name: environment_name.to_owned(),
					last_id,
					batch_size,
				}
			},

			["check-name", name, r#type] =>
				Command::CheckName { name: name.to_owned(), r#type: r#type.parse()? },

			[] => return Err(anyhow::anyhow!("no command given")),

			_ => return Err(anyhow::anyhow!("unrecognized command {:?}", args.join(" "))),
		})
	}
}

struct GlobalLogger;

impl log::Log for GlobalLogger {
	fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
		metadata.level() <= log::Level::Info
	}

	fn log(&self, record: &log::Record<'_>) {
		if !self.enabled(record.metadata()) {
			return;
		}

		let timestamp = time::OffsetDateTime::now_utc().format(time2::RFC3339_MILLISECONDS);
		let timestamp = timestamp.as_deref().unwrap_or("-");
		let level = record.level();

		eprintln!("[{timestamp}] {level:5} {}", record.args());
	}

	fn flush(&self) {
	}
}
