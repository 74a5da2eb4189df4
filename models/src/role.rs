use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

/// The three kinds of users that can log in. Every user is expected to be
/// registered under exactly one of these.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// A student enrolled in one or more courses
	Student,
	/// A trainer conducting classes
	Trainer,
	/// An administrator of the academy
	Admin,
}

impl Role {
	/// All roles, in the order their collections are probed during login
	pub const ALL: [Role; 3] = [Role::Student, Role::Trainer, Role::Admin];

	/// The lowercase name of the role, as used in URLs and on the wire
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Student => "student",
			Role::Trainer => "trainer",
			Role::Admin => "admin",
		}
	}

	/// The capitalised name of the role, used in messages shown to the user
	pub fn display_name(&self) -> &'static str {
		match self {
			Role::Student => "Student",
			Role::Trainer => "Trainer",
			Role::Admin => "Admin",
		}
	}

	/// The path of the dashboard for this role, `/{role}-dashboard`
	pub fn dashboard_path(&self) -> String {
		format!("/{}-dashboard", self.as_str())
	}

	/// The other two roles
	pub fn others(&self) -> impl Iterator<Item = Role> + '_ {
		Self::ALL.into_iter().filter(move |role| role != self)
	}
}

impl Display for Role {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Error returned when a string does not name a [`Role`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl Display for UnknownRole {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "unknown role `{}`", self.0)
	}
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
	type Err = UnknownRole;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"student" => Ok(Role::Student),
			"trainer" => Ok(Role::Trainer),
			"admin" => Ok(Role::Admin),
			unknown => Err(UnknownRole(unknown.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_test::{assert_tokens, Token};

	use super::Role;

	#[test]
	fn dashboard_paths_are_role_templated() {
		assert_eq!(Role::Student.dashboard_path(), "/student-dashboard");
		assert_eq!(Role::Trainer.dashboard_path(), "/trainer-dashboard");
		assert_eq!(Role::Admin.dashboard_path(), "/admin-dashboard");
	}

	#[test]
	fn others_excludes_self() {
		let others = Role::Trainer.others().collect::<Vec<_>>();
		assert_eq!(others, vec![Role::Student, Role::Admin]);
	}

	#[test]
	fn parses_lowercase_names_only() {
		assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
		assert!("Admin".parse::<Role>().is_err());
	}

	#[test]
	fn serializes_lowercase() {
		assert_tokens(
			&Role::Trainer,
			&[Token::UnitVariant {
				name: "Role",
				variant: "trainer",
			}],
		);
	}
}
