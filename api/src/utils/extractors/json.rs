use axum::{
	async_trait,
	extract::{FromRequest, Request},
	Json,
};
use serde::de::DeserializeOwned;

use crate::prelude::*;

/// A JSON body. Bodies that are missing or do not parse are rejected with
/// [`ErrorType::WrongParameters`], in the same envelope as every other error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = ErrorType;

	async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
		Json::<T>::from_request(request, state)
			.await
			.map(|Json(body)| Self(body))
			.map_err(|rejection| {
				debug!("Rejected request body: {}", rejection.body_text());
				ErrorType::WrongParameters
			})
	}
}
