use axum::{
	extract::{Path, State},
	routing::{get, post},
	Router,
};
use models::api::student::{CourseResponse, StudentCoursesResponse, UpdateClassNumberRequest};

use crate::{
	db::{CourseEntry, StudentRecord},
	prelude::*,
	service::{self, Session},
	utils::{
		extractors::{AuthenticatedSession, JsonBody},
		validator,
	},
};

pub fn setup_routes() -> Router<AppState> {
	Router::new()
		.route("/students/:prn/courses", get(get_student_courses))
		.route("/students/:prn/courses/:slug", get(get_course))
		.route(
			"/admin/students/:prn/courses/:index/class-number",
			post(update_class_number),
		)
}

fn course_response(prn: &str, index: usize, course: &CourseEntry) -> CourseResponse {
	CourseResponse {
		prn: prn.to_string(),
		course_index: index,
		path: match (course.course_name(), course.level_name()) {
			(Some(name), Some(level)) => course_path(prn, &name, &level),
			_ => String::new(),
		},
		course: course.to_value(),
	}
}

/// Fetches a student for a session that has to be allowed to see them
async fn visible_student(
	state: &AppState,
	session: &Session,
	prn: &str,
) -> Result<StudentRecord, ErrorType> {
	if !validator::is_prn_valid(prn) {
		return Err(ErrorType::ResourceDoesNotExist);
	}
	let student = service::get_student(state.database.as_ref(), prn).await?;
	if !service::can_view_student(session, &student) {
		return Err(ErrorType::Unauthorized);
	}
	Ok(student)
}

#[instrument(skip(state, session))]
async fn get_student_courses(
	State(state): State<AppState>,
	AuthenticatedSession(session): AuthenticatedSession,
	Path(prn): Path<String>,
) -> Result<ApiSuccessResponse<StudentCoursesResponse>, ErrorType> {
	let student = visible_student(&state, &session, &prn).await?;
	Ok(ApiSuccessResponse::ok(StudentCoursesResponse {
		prn: student.prn.clone(),
		courses: student
			.courses
			.iter()
			.enumerate()
			.map(|(index, course)| course_response(&student.prn, index, course))
			.collect(),
	}))
}

/// The course page, addressed by `/{prn}/{course}-level-{level}`
#[instrument(skip(state, session))]
async fn get_course(
	State(state): State<AppState>,
	AuthenticatedSession(session): AuthenticatedSession,
	Path((prn, slug)): Path<(String, String)>,
) -> Result<ApiSuccessResponse<CourseResponse>, ErrorType> {
	if !validator::is_prn_valid(&prn) {
		return Err(ErrorType::ResourceDoesNotExist);
	}
	let (student, index) = service::get_course(state.database.as_ref(), &prn, &slug).await?;
	if !service::can_view_student(&session, &student) {
		return Err(ErrorType::Unauthorized);
	}
	Ok(ApiSuccessResponse::ok(course_response(
		&student.prn,
		index,
		&student.courses[index],
	)))
}

#[instrument(skip(state, session, request))]
async fn update_class_number(
	State(state): State<AppState>,
	AuthenticatedSession(session): AuthenticatedSession,
	Path((prn, index)): Path<(String, usize)>,
	JsonBody(request): JsonBody<UpdateClassNumberRequest>,
) -> Result<ApiSuccessResponse<CourseResponse>, ErrorType> {
	session.require(Role::Admin)?;

	let course = service::save_class_number(
		state.database.as_ref(),
		&prn,
		index,
		&request.class_number,
	)
	.await?;
	Ok(ApiSuccessResponse::ok(course_response(prn.trim(), index, &course)))
}
