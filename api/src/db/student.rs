use serde_json::Value;

use super::{
	records::{first_string, string_or_number},
	Collection,
	DatabaseError,
	Document,
	DocumentStore,
	Fields,
};
use crate::prelude::*;

/// Field holding the PRN on a student record
pub const PRN_FIELD: &str = "PrnNumber";
/// Field holding the list of courses on a student record
pub const COURSES_FIELD: &str = "courses";

/// One course a student is enrolled in. The entry is kept as stored, since
/// different course types carry different fields, and is only ever written
/// back as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseEntry(Fields);

impl CourseEntry {
	pub fn course_name(&self) -> Option<String> {
		first_string(&self.0, &["courseName", "name"])
	}

	pub fn level_name(&self) -> Option<String> {
		first_string(&self.0, &["levelName", "level"])
	}

	pub fn class_number(&self) -> Option<String> {
		string_or_number(&self.0, "classNumber")
	}

	/// A copy of this entry with the class number replaced
	pub fn with_class_number(&self, class_number: &str) -> Self {
		let mut fields = self.0.clone();
		fields.insert(
			"classNumber".to_string(),
			Value::String(class_number.to_string()),
		);
		Self(fields)
	}

	/// The URL slug of the course page, if the entry names both a course and
	/// a level
	pub fn slug(&self) -> Option<String> {
		Some(format!(
			"{}{}{}",
			slugify(&self.course_name()?),
			constants::LEVEL_SEPARATOR,
			slugify(&self.level_name()?)
		))
	}

	pub fn to_value(&self) -> Value {
		Value::Object(self.0.clone())
	}
}

impl From<Fields> for CourseEntry {
	fn from(fields: Fields) -> Self {
		Self(fields)
	}
}

/// A record from the `students` collection
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
	pub id: String,
	pub prn: String,
	pub email: Option<String>,
	pub name: Option<String>,
	pub courses: Vec<CourseEntry>,
}

impl StudentRecord {
	/// Validates a document from the `students` collection. A missing course
	/// list is an empty one; a course list that is not a list of objects is
	/// an error, since writing it back would destroy data.
	pub fn from_document(document: Document) -> Result<Self, DatabaseError> {
		let malformed = |reason: String| DatabaseError::Malformed {
			collection: Collection::Students,
			reason,
		};

		let prn = string_or_number(&document.fields, PRN_FIELD)
			.ok_or_else(|| malformed(format!("student `{}` has no {}", document.id, PRN_FIELD)))?;

		let courses = match document.fields.get(COURSES_FIELD) {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::Array(entries)) => entries
				.iter()
				.enumerate()
				.map(|(index, entry)| match entry {
					Value::Object(fields) => Ok(CourseEntry(fields.clone())),
					_ => Err(malformed(format!(
						"course {} of student `{}` is not an object",
						index, document.id
					))),
				})
				.collect::<Result<_, _>>()?,
			Some(_) => {
				return Err(malformed(format!(
					"courses of student `{}` is not a list",
					document.id
				)))
			}
		};

		Ok(Self {
			email: first_string(&document.fields, &["email"]),
			name: first_string(&document.fields, &["name", "fullName"]),
			id: document.id,
			prn,
			courses,
		})
	}
}

/// Fetches a student by PRN. PRNs were stored both as strings and as numbers,
/// so both forms are tried.
#[instrument(skip(store))]
pub async fn get_student_by_prn(
	store: &dyn DocumentStore,
	prn: &str,
) -> Result<Option<StudentRecord>, DatabaseError> {
	let mut documents = store
		.find_by_field(Collection::Students, PRN_FIELD, &Value::String(prn.to_string()))
		.await?;

	if documents.is_empty() {
		if let Ok(number) = prn.parse::<i64>() {
			documents = store
				.find_by_field(Collection::Students, PRN_FIELD, &Value::from(number))
				.await?;
		}
	}

	documents
		.into_iter()
		.next()
		.map(StudentRecord::from_document)
		.transpose()
}

/// Writes the whole course list of a student back to the store. Nothing
/// guards against a concurrent writer: whichever list is written last is the
/// one that is kept.
#[instrument(skip(store, courses))]
pub async fn set_student_courses(
	store: &dyn DocumentStore,
	student_id: &str,
	courses: &[CourseEntry],
) -> Result<(), DatabaseError> {
	let mut fields = Fields::new();
	fields.insert(
		COURSES_FIELD.to_string(),
		Value::Array(courses.iter().map(CourseEntry::to_value).collect()),
	);
	store
		.update_fields(Collection::Students, student_id, fields)
		.await
}
