#[derive(Clone, Copy)]
pub struct ObjectId<T>(pub T);

impl std::fmt::Display for ObjectId<&'_ str> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.0)
	}
}

impl<'a, T> From<&'a T> for ObjectId<&'a str>
where
	T: AsRef<str> + ?Sized,
{
	fn from(s: &'a T) -> Self {
		ObjectId(s.as_ref())
	}
}

impl std::fmt::Display for ObjectId<(&'_ str, &'_ str)> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.0.0, self.0.1)
	}
}

impl<'a, T1, T2> From<(&'a T1, &'a T2)> for ObjectId<(&'a str, &'a str)>
where
	T1: AsRef<str> + ?Sized,
	T2: AsRef<str> + ?Sized,
{
	fn from((s1, s2): (&'a T1, &'a T2)) -> Self {
		ObjectId((s1.as_ref(), s2.as_ref()))
	}
}

impl std::fmt::Display for ObjectId<(&'_ str, &'_ str, &'_ str)> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}/{}", self.0.0, self.0.1, self.0.2)
	}
}

impl<'a, T1, T2, T3> From<(&'a T1, &'a T2, &'a T3)> for ObjectId<(&'a str, &'a str, &'a str)>
where
	T1: AsRef<str> + ?Sized,
	T2: AsRef<str> + ?Sized,
	T3: AsRef<str> + ?Sized,
{
	fn from((s1, s2, s3): (&'a T1, &'a T2, &'a T3)) -> Self {
		ObjectId((s1.as_ref(), s2.as_ref(), s3.as_ref()))
	}
}

// Resources that may be addressed through a deployment slot, eg (resource group, site, slot)
impl std::fmt::Display for ObjectId<(&'_ str, &'_ str, Option<&'_ str>)> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.0.0, self.0.1)?;
		if let Some(slot) = self.0.2 {
			write!(f, "/slots/{slot}")?;
		}
		Ok(())
	}
}

impl<'a, T1, T2, T3> From<(&'a T1, &'a T2, Option<&'a T3>)> for ObjectId<(&'a str, &'a str, Option<&'a str>)>
where
	T1: AsRef<str> + ?Sized,
	T2: AsRef<str> + ?Sized,
	T3: AsRef<str> + ?Sized,
{
	fn from((s1, s2, s3): (&'a T1, &'a T2, Option<&'a T3>)) -> Self {
		ObjectId((s1.as_ref(), s2.as_ref(), s3.map(AsRef::as_ref)))
	}
}

impl<T> serde::Serialize for ObjectId<T> where ObjectId<T>: std::fmt::Display {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: serde::Serializer {
		serializer.collect_str(self)
	}
}

#[cfg(test)]
mod tests {
	use super::ObjectId;

	#[test]
	fn display() {
		let id: ObjectId<&str> = "site1".into();
		assert_eq!(id.to_string(), "site1");

		let id: ObjectId<(&str, &str)> = ("rg1", "site1").into();
		assert_eq!(id.to_string(), "rg1/site1");

		let id: ObjectId<(&str, &str, &str)> = ("rg1", "ase1", "pool1").into();
		assert_eq!(id.to_string(), "rg1/ase1/pool1");

		let id: ObjectId<(&str, &str, Option<&str>)> = ("rg1", "site1", None::<&str>).into();
		assert_eq!(id.to_string(), "rg1/site1");

		let id: ObjectId<(&str, &str, Option<&str>)> = ("rg1", "site1", Some("staging")).into();
		assert_eq!(id.to_string(), "rg1/site1/slots/staging");
	}
}
