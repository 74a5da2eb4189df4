use super::Session;
use crate::{
	db::{self, CourseEntry, DocumentStore, StudentRecord},
	prelude::*,
};

/// Fetches a student by PRN, failing if there is none
pub async fn get_student(store: &dyn DocumentStore, prn: &str) -> Result<StudentRecord, ErrorType> {
	db::get_student_by_prn(store, prn.trim())
		.await?
		.ok_or(ErrorType::ResourceDoesNotExist)
}

/// Whether a session may see the records of a student. Students only see
/// their own; trainers and admins see everyone's.
pub fn can_view_student(session: &Session, student: &StudentRecord) -> bool {
	match session.role {
		Role::Trainer | Role::Admin => true,
		Role::Student => {
			student.id == session.record_id ||
				student.email.as_deref() == Some(session.email.as_str())
		}
	}
}

/// Finds the course a student's course page is addressed by. `slug` is the
/// `{course}-level-{level}` part of the page's path.
#[instrument(skip(store))]
pub async fn get_course(
	store: &dyn DocumentStore,
	prn: &str,
	slug: &str,
) -> Result<(StudentRecord, usize), ErrorType> {
	if parse_course_slug(slug).is_none() {
		return Err(ErrorType::ResourceDoesNotExist);
	}
	let student = get_student(store, prn).await?;
	let index = student
		.courses
		.iter()
		.position(|course| course.slug().as_deref() == Some(slug))
		.ok_or(ErrorType::ResourceDoesNotExist)?;
	Ok((student, index))
}

/// The course list of a student with one class number replaced. Nothing
/// else in the list changes.
pub fn with_class_number(
	student: &StudentRecord,
	course_index: usize,
	class_number: &str,
) -> Result<Vec<CourseEntry>, ErrorType> {
	let mut courses = student.courses.clone();
	let course = courses
		.get_mut(course_index)
		.ok_or(ErrorType::ResourceDoesNotExist)?;
	*course = course.with_class_number(class_number);
	Ok(courses)
}

/// Sets the class number of one of a student's courses.
///
/// The student is fetched again instead of trusting whatever copy the caller
/// has, and the whole course list is written back. There is no version check
/// between the read and the write, so when two admins save at the same time
/// the list written last wins, including its copies of the other courses.
#[instrument(skip(store))]
pub async fn save_class_number(
	store: &dyn DocumentStore,
	prn: &str,
	course_index: usize,
	class_number: &str,
) -> Result<CourseEntry, ErrorType> {
	let class_number = class_number.trim();
	if class_number.is_empty() {
		return Err(ErrorType::WrongParameters);
	}

	let student = get_student(store, prn).await?;
	let mut courses = with_class_number(&student, course_index, class_number)?;
	db::set_student_courses(store, &student.id, &courses).await?;

	info!(
		"Set class number of course {} of student `{}` to `{}`",
		course_index, student.prn, class_number
	);
	Ok(courses.swap_remove(course_index))
}
