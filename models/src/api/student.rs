use serde::{Deserialize, Serialize};

/// Body of `POST /api/admin/students/:prn/courses/:index/class-number`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassNumberRequest {
	pub class_number: String,
}

/// A single course as shown on the course page and in dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
	pub prn: String,
	pub course_index: usize,
	/// `/{prn}/{course}-level-{level}`
	pub path: String,
	/// The course entry as stored on the student record
	pub course: serde_json::Value,
}

/// All the courses of a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCoursesResponse {
	pub prn: String,
	pub courses: Vec<CourseResponse>,
}
