use models::api::registration::{Registration, RegistrationRequest};
use time::OffsetDateTime;

use crate::{
	db::{self, DocumentStore, NewRegistration},
	prelude::*,
	utils::validator,
};

/// Stores a registration from the public course registration form
#[instrument(skip(store, request), fields(email = %request.email))]
pub async fn submit_registration(
	store: &dyn DocumentStore,
	request: &RegistrationRequest,
) -> Result<String, ErrorType> {
	let (Some(name), Some(email), Some(phone), Some(course_name)) = (
		validator::required(&request.name),
		validator::required(&request.email),
		validator::required(&request.phone),
		validator::required(&request.course_name),
	) else {
		return Err(ErrorType::WrongParameters);
	};
	if !validator::is_email_valid(email) {
		return Err(ErrorType::InvalidEmail);
	}
	if !validator::is_phone_number_valid(phone) {
		return Err(ErrorType::WrongParameters);
	}

	let id = db::create_registration(
		store,
		NewRegistration {
			name,
			email,
			phone,
			course_name,
			school: request.school.as_deref().and_then(validator::required),
			grade: request.grade.as_deref().and_then(validator::required),
		},
		OffsetDateTime::now_utc(),
	)
	.await?;
	info!("Stored registration `{}` for {}", id, course_name);
	Ok(id)
}

pub async fn list_registrations(store: &dyn DocumentStore) -> Result<Vec<Registration>, ErrorType> {
	Ok(db::list_registrations(store)
		.await?
		.into_iter()
		.map(Registration::from)
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::db::MemoryStore;

	fn request() -> RegistrationRequest {
		RegistrationRequest {
			name: "Jane".into(),
			email: "jane@x.com".into(),
			phone: "+91 98765 43210".into(),
			course_name: "Robotics".into(),
			school: Some("  ".into()),
			grade: Some("7".into()),
		}
	}

	#[tokio::test]
	async fn valid_registrations_are_listed() {
		let store = MemoryStore::new();
		let id = submit_registration(&store, &request()).await.unwrap();

		let registrations = list_registrations(&store).await.unwrap();
		assert_eq!(registrations.len(), 1);
		assert_eq!(registrations[0].id, id);
		assert_eq!(registrations[0].school, None);
		assert_eq!(registrations[0].grade.as_deref(), Some("7"));
	}

	#[tokio::test]
	async fn invalid_registrations_are_rejected() {
		let store = MemoryStore::new();

		let missing_course = RegistrationRequest {
			course_name: String::new(),
			..request()
		};
		assert_eq!(
			submit_registration(&store, &missing_course).await.unwrap_err(),
			ErrorType::WrongParameters
		);

		let bad_email = RegistrationRequest {
			email: "jane".into(),
			..request()
		};
		assert_eq!(
			submit_registration(&store, &bad_email).await.unwrap_err(),
			ErrorType::InvalidEmail
		);

		let bad_phone = RegistrationRequest {
			phone: "123".into(),
			..request()
		};
		assert_eq!(
			submit_registration(&store, &bad_phone).await.unwrap_err(),
			ErrorType::WrongParameters
		);
		assert!(list_registrations(&store).await.unwrap().is_empty());
	}
}
