mod object_id;
pub use object_id::ObjectId;

pub struct Logger {
	invocation_id: Option<String>,
	sequence_number: std::sync::atomic::AtomicUsize,
}

impl Logger {
	pub fn new(invocation_id: Option<String>) -> Self {
		Logger {
			invocation_id,
			sequence_number: Default::default(),
		}
	}

	pub fn report_error(&self, err: &anyhow::Error) {
		self.report_inner(Report::Error { err });
	}

	pub fn report_message(&self, message: std::fmt::Arguments<'_>) {
		self.report_inner(Report::Message { message: &message.to_string() });
	}

	pub async fn report_operation<TId, TValue, F>(
		&self,
		r#type: &str,
		id: impl Into<ObjectId<TId>>,
		operation: ScopedObjectOperation<'_, TValue>,
		f: F,
	) -> F::Output
	where
		ObjectId<TId>: std::fmt::Display,
		TValue: std::fmt::Display,
		F: std::future::Future,
		F::Output: std::fmt::Debug,
	{
		let id = id.into().to_string();
		let id = &*id;

		match operation {
			ScopedObjectOperation::Create { value } => {
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::CreateStart { value: &value.to_string() } });
				let result = f.await;
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::CreateEnd });
				result
			},

			ScopedObjectOperation::Update { value } => {
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::UpdateStart { value: &value.to_string() } });
				let result = f.await;
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::UpdateEnd });
				result
			},

			ScopedObjectOperation::Delete => {
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::DeleteStart });
				let result = f.await;
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::DeleteEnd });
				result
			},

			ScopedObjectOperation::Get => {
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::GetStart });
				let result = f.await;
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::GetEnd { value: &format!("{result:?}") } });
				result
			},

			ScopedObjectOperation::Action { name } => {
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::ActionStart { name } });
				let result = f.await;
				self.report_inner(Report::ObjectOperation { r#type, id, operation: ObjectOperation::ActionEnd { name } });
				result
			},
		}
	}

	pub fn report_state<TId>(&self, r#type: &str, id: impl Into<ObjectId<TId>>, state: impl std::fmt::Display)
	where
		ObjectId<TId>: std::fmt::Display,
	{
		self.report_inner(Report::ObjectState { r#type, id: &id.into().to_string(), state: &state.to_string() });
	}

	fn report_inner(&self, report: Report<'_>) {
		let timestamp = time::OffsetDateTime::now_utc();
		let sequence_number = self.sequence_number.fetch_add(1, std::sync::atomic::Ordering::AcqRel) + 1;

		let record = Record {
			timestamp,
			sequence_number,
			invocation_id: self.invocation_id.as_deref(),
			report,
		};
		let record = match serde_json::to_string(&record) {
			Ok(record) => record,
			Err(err) => format!("{report:?} (could not serialize log record: {err})"),
		};

		log::log!(
			if matches!(report, Report::Error { .. }) { log::Level::Error } else { log::Level::Info },
			"{record}",
		);
	}
}

#[derive(Clone, Copy)]
pub enum ScopedObjectOperation<'a, T = std::fmt::Arguments<'static>> {
	Create { value: T },
	Update { value: T },
	Delete,
	Get,
	Action { name: &'a str },
}

impl<'a, T> ScopedObjectOperation<'a, T> {
	pub fn action(name: &'a str) -> Self {
		ScopedObjectOperation::Action { name }
	}
}

#[derive(Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Secret<T>(pub T);

impl<T> std::fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("******")
	}
}

struct Record<'a> {
	timestamp: time::OffsetDateTime,
	sequence_number: usize,
	invocation_id: Option<&'a str>,
	report: Report<'a>,
}

#[derive(Clone, Copy, Debug)]
enum Report<'a> {
	Error {
		err: &'a anyhow::Error,
	},

	Message {
		message: &'a str,
	},

	ObjectOperation {
		r#type: &'a str,
		id: &'a str,
		operation: ObjectOperation<'a>,
	},

	ObjectState {
		r#type: &'a str,
		id: &'a str,
		state: &'a str,
	},
}

#[derive(Clone, Copy, Debug)]
enum ObjectOperation<'a> {
	CreateStart { value: &'a str },
	CreateEnd,

	UpdateStart { value: &'a str },
	UpdateEnd,

	DeleteStart,
	DeleteEnd,

	GetStart,
	GetEnd { value: &'a str },

	ActionStart { name: &'a str },
	ActionEnd { name: &'a str },
}

impl serde::Serialize for Record<'_> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: serde::Serializer {
		use serde::ser::SerializeMap;

		let Record {
			timestamp,
			sequence_number,
			invocation_id,
			report,
		} = self;

		let mut serializer = serializer.serialize_map(None)?;

		let timestamp = timestamp.format(time2::RFC3339_MILLISECONDS).map_err(serde::ser::Error::custom)?;
		serializer.serialize_entry("TimeCollected", &timestamp)?;
		if let Some(invocation_id) = invocation_id {
			serializer.serialize_entry("InvocationId", invocation_id)?;
		}
		serializer.serialize_entry("SequenceNumber", sequence_number)?;

		match report {
			Report::Error { err } => {
				serializer.serialize_entry("Level", "Error")?;
				serializer.serialize_entry("Exception", &format!("{err:?}"))?;
			},

			Report::Message { message } => {
				serializer.serialize_entry("Level", "Information")?;
				serializer.serialize_entry("Message", message)?;
			},

			Report::ObjectOperation { r#type, id, operation } => {
				serializer.serialize_entry("Level", "Information")?;
				serializer.serialize_entry("ObjectType", r#type)?;
				serializer.serialize_entry("ObjectId", id)?;
				match operation {
					ObjectOperation::CreateStart { value } => {
						serializer.serialize_entry("ObjectOperation", "CreateStart")?;
						serializer.serialize_entry("ObjectValue", value)?;
					},

					ObjectOperation::CreateEnd => serializer.serialize_entry("ObjectOperation", "CreateEnd")?,

					ObjectOperation::UpdateStart { value } => {
						serializer.serialize_entry("ObjectOperation", "UpdateStart")?;
						serializer.serialize_entry("ObjectValue", value)?;
					},

					ObjectOperation::UpdateEnd => serializer.serialize_entry("ObjectOperation", "UpdateEnd")?,

					ObjectOperation::DeleteStart => serializer.serialize_entry("ObjectOperation", "DeleteStart")?,

					ObjectOperation::DeleteEnd => serializer.serialize_entry("ObjectOperation", "DeleteEnd")?,

					ObjectOperation::GetStart => serializer.serialize_entry("ObjectOperation", "GetStart")?,

					ObjectOperation::GetEnd { value } => {
						serializer.serialize_entry("ObjectOperation", "GetEnd")?;
						serializer.serialize_entry("ObjectValue", value)?;
					},

					ObjectOperation::ActionStart { name } => {
						serializer.serialize_entry("ObjectOperation", "ActionStart")?;
						serializer.serialize_entry("ObjectAction", name)?;
					},

					ObjectOperation::ActionEnd { name } => {
						serializer.serialize_entry("ObjectOperation", "ActionEnd")?;
						serializer.serialize_entry("ObjectAction", name)?;
					},
				}
			},

			Report::ObjectState { r#type, id, state } => {
				serializer.serialize_entry("Level", "Information")?;
				serializer.serialize_entry("ObjectType", r#type)?;
				serializer.serialize_entry("ObjectId", id)?;
				serializer.serialize_entry("ObjectState", state)?;
			},
		}

		serializer.end()
	}
}

#[cfg(test)]
mod tests {
	fn serialize(report: super::Report<'_>, invocation_id: Option<&str>) -> serde_json::Value {
		let record = super::Record {
			timestamp: time::OffsetDateTime::UNIX_EPOCH + time::Duration::milliseconds(1_600_000_000_123),
			sequence_number: 3,
			invocation_id,
			report,
		};
		serde_json::to_value(record).unwrap()
	}

	#[test]
	fn object_operation_record() {
		let record = serialize(
			super::Report::ObjectOperation {
				r#type: "azure/web/site",
				id: "rg1/site1",
				operation: super::ObjectOperation::GetEnd { value: "Ok(None)" },
			},
			Some("4f0e1c1a"),
		);
		assert_eq!(record, serde_json::json!({
			"TimeCollected": "2020-09-13T12:26:40.123Z",
			"InvocationId": "4f0e1c1a",
			"SequenceNumber": 3,
			"Level": "Information",
			"ObjectType": "azure/web/site",
			"ObjectId": "rg1/site1",
			"ObjectOperation": "GetEnd",
			"ObjectValue": "Ok(None)",
		}));
	}

	#[test]
	fn error_record() {
		let err = anyhow::anyhow!("unexpected response 500 Internal Server Error: None").context("could not get site");
		let record = serialize(super::Report::Error { err: &err }, None);
		assert_eq!(record["Level"], "Error");
		assert!(record.get("InvocationId").is_none());
		let exception = record["Exception"].as_str().unwrap();
		assert!(exception.starts_with("could not get site"));
		assert!(exception.contains("unexpected response 500"));
	}

	#[test]
	fn action_record() {
		let record = serialize(
			super::Report::ObjectOperation {
				r#type: "azure/web/site",
				id: "rg1/site1",
				operation: super::ObjectOperation::ActionStart { name: "restart" },
			},
			None,
		);
		assert_eq!(record["ObjectOperation"], "ActionStart");
		assert_eq!(record["ObjectAction"], "restart");
	}

	#[test]
	fn sequence_numbers_increase() {
		let logger = super::Logger::new(None);
		logger.report_message(format_args!("first"));
		logger.report_state("azure/web/site", "site1", "running");
		assert_eq!(logger.sequence_number.load(std::sync::atomic::Ordering::Acquire), 2);
	}

	#[tokio::test]
	async fn action_operation() {
		let logger = super::Logger::new(None);
		let result =
			logger.report_operation("azure/web/site", ("rg1", "site1"), <super::ScopedObjectOperation<'_>>::action("restart"), async {
				Ok::<_, ()>(())
			}).await;
		assert_eq!(result, Ok(()));
		assert_eq!(logger.sequence_number.load(std::sync::atomic::Ordering::Acquire), 2);

		let operation = <super::ScopedObjectOperation<'_>>::action("stop");
		assert!(matches!(operation, super::ScopedObjectOperation::Action { name: "stop" }));
	}

	#[test]
	fn secret_debug() {
		assert_eq!(format!("{:?}", super::Secret("Bearer eyJ0eXAi")), "******");
	}
}
