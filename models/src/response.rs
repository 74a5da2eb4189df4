use serde::{Deserialize, Serialize};

use crate::{
	utils::{False, True},
	ErrorType,
	StatusCode,
};

/// This struct represents a successful response from the API. It contains the
/// status code and body.
#[derive(Debug)]
pub struct ApiSuccessResponse<T> {
	/// The status code of the success response. Ideally in the 2xx range.
	pub status_code: StatusCode,
	/// The body of the success response. This is the actual data that will be
	/// sent to the client.
	pub body: T,
}

impl<T> ApiSuccessResponse<T> {
	/// A `200 OK` response with the given body
	pub fn ok(body: T) -> Self {
		Self {
			status_code: 200,
			body,
		}
	}
}

/// This struct represents the JSON body of successful response from the API.
/// This is mostly used internally and would ideally not need to be constructed
/// manually.
///
/// Use [`ApiSuccessResponse`] to create a success response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiSuccessResponseBody<T> {
	/// Whether the request was successful or not. This is always true.
	pub success: True,
	/// The JSON body of the response. This is flattened so that the fields of
	/// the body are at the top level.
	#[serde(flatten)]
	pub response: T,
}

/// This struct represents an error response from the API. It contains the
/// status code and the body of the response.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
	/// The status code of the error response. Ideally in the 4xx or 5xx range.
	pub status_code: StatusCode,
	/// The body of the error response. This is a JSON object that contains the
	/// error message.
	pub body: ApiErrorResponseBody,
}

impl ApiErrorResponse {
	/// Creates a new [`ApiErrorResponse`] with the given [`ErrorType`], using
	/// the default status code.
	pub fn error(error: ErrorType) -> Self {
		Self {
			status_code: error.default_status_code(),
			body: ApiErrorResponseBody {
				success: False,
				message: error.message(),
				error,
			},
		}
	}
}

impl From<ErrorType> for ApiErrorResponse {
	fn from(error: ErrorType) -> Self {
		Self::error(error)
	}
}

/// This struct represents the JSON body of an error response from the API.
/// This is mostly used internally and would ideally not need to be constructed
/// manually.
///
/// Use [`ApiErrorResponse`] to create an error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponseBody {
	/// Whether the request was successful or not. This is always false.
	pub success: False,
	/// The error type of the response.
	pub error: ErrorType,
	/// A user-friendly message describing the error.
	pub message: String,
}

/// This struct represents the JSON body of a response from the API. It can be
/// either a success or an error response. This is used by clients to parse
/// the response and determine whether it was successful or not.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ApiResponseBody<T> {
	/// Success response, with the given body.
	Success(ApiSuccessResponseBody<T>),
	/// Error response
	Error(ApiErrorResponseBody),
}

#[cfg(feature = "axum")]
mod axum_impls {
	use axum::{
		http::StatusCode,
		response::{IntoResponse, Response},
		Json,
	};
	use serde::Serialize;

	use super::*;

	fn status(code: u16) -> StatusCode {
		StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
	}

	impl<T> IntoResponse for ApiSuccessResponse<T>
	where
		T: Serialize,
	{
		fn into_response(self) -> Response {
			(
				status(self.status_code),
				Json(ApiSuccessResponseBody {
					success: True,
					response: self.body,
				}),
			)
				.into_response()
		}
	}

	impl IntoResponse for ApiErrorResponse {
		fn into_response(self) -> Response {
			(status(self.status_code), Json(self.body)).into_response()
		}
	}

	impl IntoResponse for ErrorType {
		fn into_response(self) -> Response {
			if let ErrorType::InternalServerError(error) = &self {
				tracing::error!("Internal server error: {error:?}");
			}
			ApiErrorResponse::error(self).into_response()
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_test::{assert_ser_tokens, Token};

	use super::*;

	#[test]
	fn error_body_has_code_and_message() {
		let response = ApiErrorResponse::error(ErrorType::WrongPassword);
		assert_eq!(response.status_code, 401);
		assert_ser_tokens(
			&response.body,
			&[
				Token::Struct {
					name: "ApiErrorResponseBody",
					len: 3,
				},
				Token::Str("success"),
				Token::Bool(false),
				Token::Str("error"),
				Token::Str("wrongPassword"),
				Token::Str("message"),
				Token::Str("Incorrect password"),
				Token::StructEnd,
			],
		);
	}

	#[test]
	fn untagged_body_distinguishes_success_from_error() {
		let body: ApiResponseBody<serde_json::Value> = serde_json::from_str(
			r#"{"success":false,"error":"roleConflict","message":"conflict"}"#,
		)
		.unwrap();
		assert!(matches!(body, ApiResponseBody::Error(ApiErrorResponseBody {
			error: ErrorType::RoleConflict,
			..
		})));
	}
}
