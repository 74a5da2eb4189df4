use jsonwebtoken::{
	errors::Error,
	Algorithm,
	DecodingKey,
	EncodingKey,
	Header,
	TokenData,
	Validation,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::prelude::*;

/// The data signed into the access token handed out on login. The token only
/// points at a server side session: a token whose session is gone is useless
/// even while its signature and expiry are still valid.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenData {
	pub iss: String,
	/// The auth provider's uid of the account
	pub sub: String,
	pub iat: i64,
	pub exp: i64,
	/// The login ID of the session this token belongs to
	pub jti: Uuid,
	pub role: Role,
}

impl AccessTokenData {
	pub const ISSUER: &'static str = "academy-api";

	pub fn new(
		sub: String,
		jti: Uuid,
		role: Role,
		issued_at: OffsetDateTime,
		expires_at: OffsetDateTime,
	) -> Self {
		AccessTokenData {
			iss: Self::ISSUER.to_string(),
			sub,
			iat: issued_at.unix_timestamp(),
			exp: expires_at.unix_timestamp(),
			jti,
			role,
		}
	}

	/// Verifies the signature and expiry of a token
	pub fn parse(token: &str, key: &str) -> Result<AccessTokenData, Error> {
		let decode_key = DecodingKey::from_secret(key.as_ref());
		let TokenData { header: _, claims } = jsonwebtoken::decode(token, &decode_key, &{
			let mut validation = Validation::new(Algorithm::HS256);
			validation.set_issuer(&[Self::ISSUER]);
			validation.leeway = 0;
			validation
		})?;
		Ok(claims)
	}

	pub fn to_string(&self, key: &str) -> Result<String, Error> {
		jsonwebtoken::encode(
			&Header::new(Algorithm::HS256),
			&self,
			&EncodingKey::from_secret(key.as_ref()),
		)
	}
}

#[cfg(test)]
mod tests {
	use time::Duration;

	use super::*;

	#[test]
	fn tokens_signed_with_another_key_are_rejected() {
		let now = OffsetDateTime::now_utc();
		let data = AccessTokenData::new(
			"uid".into(),
			Uuid::new_v4(),
			Role::Trainer,
			now,
			now + Duration::hours(1),
		);
		let token = data.to_string("secret").unwrap();

		assert_eq!(AccessTokenData::parse(&token, "secret").unwrap(), data);
		assert!(AccessTokenData::parse(&token, "other").is_err());
	}

	#[test]
	fn expired_tokens_are_rejected() {
		let now = OffsetDateTime::now_utc();
		let token = AccessTokenData::new(
			"uid".into(),
			Uuid::new_v4(),
			Role::Student,
			now - Duration::hours(2),
			now - Duration::hours(1),
		)
		.to_string("secret")
		.unwrap();

		assert!(AccessTokenData::parse(&token, "secret").is_err());
	}
}
