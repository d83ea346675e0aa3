pub const RFC3339_MILLISECONDS: &[time::format_description::BorrowedFormatItem<'_>] =
	time::macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

#[cfg(test)]
mod tests {
	#[test]
	fn rfc3339_milliseconds() {
		let timestamp = time::OffsetDateTime::UNIX_EPOCH + time::Duration::milliseconds(1_600_000_000_007);
		assert_eq!(timestamp.format(super::RFC3339_MILLISECONDS).unwrap(), "2020-09-13T12:26:40.007Z");
	}
}
