use std::{
	error::Error as StdError,
	fmt::{Display, Formatter},
	mem,
};

use serde::{de::Error, Deserialize, Serialize};

use crate::Role;

/// The HTTP status a given [`ErrorType`] maps to by default. Kept as a plain
/// number so that this crate can be used without pulling in an HTTP stack.
pub type StatusCode = u16;

/// A list of all the possible errors that can be returned by the API
#[derive(Debug)]
pub enum ErrorType {
	/// The parameters sent with the request are invalid or a required field
	/// was left empty
	WrongParameters,
	/// The email provided is not a well formed email address
	InvalidEmail,
	/// The auth provider rejected the email and password combination without
	/// saying which one was wrong
	InvalidCredential,
	/// No account exists with the auth provider for the given email
	UserNotFound,
	/// The account exists but the password does not match
	WrongPassword,
	/// The auth provider is rate limiting sign in attempts for this account
	TooManyRequests,
	/// The auth provider could not be reached
	NetworkFailure,
	/// Any other error reported by the auth provider, carrying the provider's
	/// own message
	AuthProvider(String),
	/// The credentials are valid but no role record exists for the email in
	/// any collection
	NotRegistered,
	/// The credentials are valid but the email is registered under a
	/// different role than the one that was selected
	RoleMismatch {
		/// The role the email is actually registered as
		registered: Role,
		/// The role the user selected while logging in
		asserted: Role,
	},
	/// The email has role records in more than one role collection
	RoleConflict,
	/// The request has no valid session, or the session's role is not allowed
	/// to perform the requested action
	Unauthorized,
	/// The resource that the user is trying to access does not exist.
	ResourceDoesNotExist,
	/// An internal server error occurred. This should not happen unless there
	/// is a bug in the server or an upstream service failed
	InternalServerError(anyhow::Error),
}

impl ErrorType {
	/// Returns the status code that should be used for this error. Note that
	/// this is only the default status code and specific endpoints can override
	/// this if needed
	pub fn default_status_code(&self) -> StatusCode {
		match self {
			Self::WrongParameters => 400,
			Self::InvalidEmail => 400,
			Self::InvalidCredential => 401,
			Self::UserNotFound => 401,
			Self::WrongPassword => 401,
			Self::TooManyRequests => 429,
			Self::NetworkFailure => 502,
			Self::AuthProvider(_) => 401,
			Self::NotRegistered => 403,
			Self::RoleMismatch { .. } => 403,
			Self::RoleConflict => 403,
			Self::Unauthorized => 401,
			Self::ResourceDoesNotExist => 404,
			Self::InternalServerError(_) => 500,
		}
	}

	/// Returns the message that should be used for this error. This is the
	/// message that is user-friendly and can be shown to the user
	pub fn message(&self) -> String {
		match self {
			Self::WrongParameters => "Please fill in all the required fields".into(),
			Self::InvalidEmail => "Invalid email address".into(),
			Self::InvalidCredential => "Invalid email or password".into(),
			Self::UserNotFound => "No account found with this email".into(),
			Self::WrongPassword => "Incorrect password".into(),
			Self::TooManyRequests => {
				"Too many failed login attempts. Please try again later".into()
			}
			Self::NetworkFailure => {
				"Network error. Please check your connection and try again".into()
			}
			Self::AuthProvider(message) => message.clone(),
			Self::NotRegistered => "User not found in system. Please contact the academy".into(),
			Self::RoleMismatch {
				registered,
				asserted,
			} => format!(
				"You are registered as {}, not {}. Please select the correct role",
				registered.display_name(),
				asserted.display_name()
			),
			Self::RoleConflict => {
				"This email is registered under more than one role. Please contact the academy"
					.into()
			}
			Self::Unauthorized => "You are not authorized to perform that action".into(),
			Self::ResourceDoesNotExist => {
				"The resource you are trying to access does not exist".into()
			}
			Self::InternalServerError(_) => "An internal server error has occured".into(),
		}
	}

	/// Creates an [`ErrorType::InternalServerError`] with the given message
	pub fn server_error(message: impl Display) -> Self {
		Self::InternalServerError(anyhow::anyhow!(message.to_string()))
	}

	/// Whether this error was raised while verifying credentials with the auth
	/// provider, before any role lookup happened
	pub fn is_credential_error(&self) -> bool {
		matches!(
			self,
			Self::InvalidCredential |
				Self::UserNotFound |
				Self::WrongPassword |
				Self::InvalidEmail |
				Self::TooManyRequests |
				Self::NetworkFailure |
				Self::AuthProvider(_)
		)
	}
}

impl PartialEq for ErrorType {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::InternalServerError(_), Self::InternalServerError(_)) => true,
			(Self::AuthProvider(left), Self::AuthProvider(right)) => left == right,
			(
				Self::RoleMismatch {
					registered: left_registered,
					asserted: left_asserted,
				},
				Self::RoleMismatch {
					registered: right_registered,
					asserted: right_asserted,
				},
			) => left_registered == right_registered && left_asserted == right_asserted,
			_ => mem::discriminant(self) == mem::discriminant(other),
		}
	}
}

impl Eq for ErrorType {}

impl<Error> From<Error> for ErrorType
where
	Error: StdError + Send + Sync + 'static,
{
	fn from(error: Error) -> Self {
		Self::InternalServerError(error.into())
	}
}

impl Clone for ErrorType {
	fn clone(&self) -> Self {
		match self {
			Self::WrongParameters => Self::WrongParameters,
			Self::InvalidEmail => Self::InvalidEmail,
			Self::InvalidCredential => Self::InvalidCredential,
			Self::UserNotFound => Self::UserNotFound,
			Self::WrongPassword => Self::WrongPassword,
			Self::TooManyRequests => Self::TooManyRequests,
			Self::NetworkFailure => Self::NetworkFailure,
			Self::AuthProvider(message) => Self::AuthProvider(message.clone()),
			Self::NotRegistered => Self::NotRegistered,
			Self::RoleMismatch {
				registered,
				asserted,
			} => Self::RoleMismatch {
				registered: *registered,
				asserted: *asserted,
			},
			Self::RoleConflict => Self::RoleConflict,
			Self::Unauthorized => Self::Unauthorized,
			Self::ResourceDoesNotExist => Self::ResourceDoesNotExist,
			Self::InternalServerError(arg0) => {
				Self::InternalServerError(anyhow::anyhow!(arg0.to_string()))
			}
		}
	}
}

impl Display for ErrorType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.message())
	}
}

impl Serialize for ErrorType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(match self {
			Self::WrongParameters => "wrongParameters",
			Self::InvalidEmail => "invalidEmail",
			Self::InvalidCredential => "invalidCredential",
			Self::UserNotFound => "userNotFound",
			Self::WrongPassword => "wrongPassword",
			Self::TooManyRequests => "tooManyRequests",
			Self::NetworkFailure => "networkFailure",
			Self::AuthProvider(_) => "authProvider",
			Self::NotRegistered => "notRegistered",
			Self::RoleMismatch { .. } => "roleMismatch",
			Self::RoleConflict => "roleConflict",
			Self::Unauthorized => "unauthorized",
			Self::ResourceDoesNotExist => "resourceDoesNotExist",
			Self::InternalServerError(_) => "internalServerError",
		})
	}
}

impl<'de> Deserialize<'de> for ErrorType {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		// Data carrying variants lose their payload on the wire. The message
		// field of the response envelope carries it instead.
		let string = String::deserialize(deserializer)?;
		Ok(match string.as_str() {
			"wrongParameters" => Self::WrongParameters,
			"invalidEmail" => Self::InvalidEmail,
			"invalidCredential" => Self::InvalidCredential,
			"userNotFound" => Self::UserNotFound,
			"wrongPassword" => Self::WrongPassword,
			"tooManyRequests" => Self::TooManyRequests,
			"networkFailure" => Self::NetworkFailure,
			"authProvider" => Self::AuthProvider(String::new()),
			"notRegistered" => Self::NotRegistered,
			"roleConflict" => Self::RoleConflict,
			"unauthorized" => Self::Unauthorized,
			"resourceDoesNotExist" => Self::ResourceDoesNotExist,
			"internalServerError" => {
				Self::InternalServerError(anyhow::anyhow!("Internal Server Error"))
			}
			unknown => return Err(Error::custom(format!("unknown variant: {unknown}"))),
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_test::{assert_ser_tokens, Token};

	use super::ErrorType;
	use crate::Role;

	#[test]
	fn role_mismatch_message_names_both_roles() {
		let error = ErrorType::RoleMismatch {
			registered: Role::Trainer,
			asserted: Role::Student,
		};
		assert_eq!(
			error.message(),
			"You are registered as Trainer, not Student. Please select the correct role"
		);
		assert_eq!(error.default_status_code(), 403);
	}

	#[test]
	fn provider_message_is_passed_through() {
		let error = ErrorType::AuthProvider("USER_DISABLED".to_string());
		assert_eq!(error.message(), "USER_DISABLED");
		assert!(error.is_credential_error());
		assert!(!ErrorType::RoleConflict.is_credential_error());
	}

	#[test]
	fn wrong_password_message() {
		assert_eq!(ErrorType::WrongPassword.message(), "Incorrect password");
	}

	#[test]
	fn serializes_as_camel_case_code() {
		assert_ser_tokens(&ErrorType::RoleConflict, &[Token::Str("roleConflict")]);
		assert_ser_tokens(
			&ErrorType::RoleMismatch {
				registered: Role::Admin,
				asserted: Role::Student,
			},
			&[Token::Str("roleMismatch")],
		);
	}

	#[test]
	fn internal_errors_compare_equal() {
		assert_eq!(
			ErrorType::server_error("a"),
			ErrorType::server_error("b")
		);
		assert_ne!(ErrorType::WrongPassword, ErrorType::UserNotFound);
	}
}
