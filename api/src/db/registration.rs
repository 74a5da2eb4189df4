use models::api::registration::Registration;
use serde_json::Value;
use time::OffsetDateTime;

use super::{
	records::{first_string, format_timestamp, string_or_number, timestamp},
	Collection,
	DatabaseError,
	Document,
	DocumentStore,
	Fields,
};
use crate::prelude::*;

/// A course registration submitted through the public form
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRecord {
	pub id: String,
	pub name: String,
	pub email: String,
	pub phone: String,
	pub course_name: String,
	pub school: Option<String>,
	pub grade: Option<String>,
	pub submitted_at: Option<OffsetDateTime>,
}

impl RegistrationRecord {
	pub fn from_document(document: Document) -> Self {
		let fields = &document.fields;
		Self {
			name: first_string(fields, &["name", "fullName"]).unwrap_or_default(),
			email: first_string(fields, &["email"]).unwrap_or_default(),
			phone: string_or_number(fields, "phone").unwrap_or_default(),
			course_name: first_string(fields, &["courseName", "course"]).unwrap_or_default(),
			school: first_string(fields, &["school"]),
			grade: string_or_number(fields, "grade"),
			submitted_at: timestamp(fields, "submittedAt"),
			id: document.id,
		}
	}
}

impl From<RegistrationRecord> for Registration {
	fn from(record: RegistrationRecord) -> Self {
		Registration {
			id: record.id,
			name: record.name,
			email: record.email,
			phone: record.phone,
			course_name: record.course_name,
			school: record.school,
			grade: record.grade,
			submitted_at: record.submitted_at,
		}
	}
}

/// The fields of a new registration. Email is stored as given so that the
/// login lookup matches it verbatim.
#[derive(Debug, Clone)]
pub struct NewRegistration<'a> {
	pub name: &'a str,
	pub email: &'a str,
	pub phone: &'a str,
	pub course_name: &'a str,
	pub school: Option<&'a str>,
	pub grade: Option<&'a str>,
}

#[instrument(skip(store, registration), fields(email = registration.email))]
pub async fn create_registration(
	store: &dyn DocumentStore,
	registration: NewRegistration<'_>,
	submitted_at: OffsetDateTime,
) -> Result<String, DatabaseError> {
	let mut fields = Fields::new();
	fields.insert("name".into(), Value::String(registration.name.to_string()));
	fields.insert("email".into(), Value::String(registration.email.to_string()));
	fields.insert("phone".into(), Value::String(registration.phone.to_string()));
	fields.insert(
		"courseName".into(),
		Value::String(registration.course_name.to_string()),
	);
	if let Some(school) = registration.school {
		fields.insert("school".into(), Value::String(school.to_string()));
	}
	if let Some(grade) = registration.grade {
		fields.insert("grade".into(), Value::String(grade.to_string()));
	}
	fields.insert("submittedAt".into(), format_timestamp(submitted_at));

	store.insert(Collection::Registrations, fields).await
}

/// Every registration, most recently submitted first
pub async fn list_registrations(
	store: &dyn DocumentStore,
) -> Result<Vec<RegistrationRecord>, DatabaseError> {
	let mut registrations = store
		.list(Collection::Registrations)
		.await?
		.into_iter()
		.map(RegistrationRecord::from_document)
		.collect::<Vec<_>>();
	registrations.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
	Ok(registrations)
}
