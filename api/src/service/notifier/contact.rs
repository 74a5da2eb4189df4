use lettre::{message::Mailbox, Address};
use models::api::contact::SendEmailRequest;
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{
	prelude::*,
	utils::{mailer::Mailer, validator},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactFormEmail<'a> {
	name: &'a str,
	email: &'a str,
	message: &'a str,
	submitted_at: String,
}

/// A contact form submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
	pub name: String,
	pub email: Address,
	pub message: String,
}

/// Checks a contact form submission. Name, email and message are required,
/// and the email has to look like one.
pub fn validate_contact_message(request: &SendEmailRequest) -> Result<ContactMessage, ErrorType> {
	let (Some(name), Some(email), Some(message)) = (
		request.name.as_deref().and_then(validator::required),
		request.email.as_deref().and_then(validator::required),
		request.message.as_deref().and_then(validator::required),
	) else {
		return Err(ErrorType::WrongParameters);
	};

	if !validator::is_email_valid(email) {
		return Err(ErrorType::InvalidEmail);
	}
	let email = email.parse::<Address>().map_err(|_| ErrorType::InvalidEmail)?;

	Ok(ContactMessage {
		name: name.to_string(),
		email,
		message: message.to_string(),
	})
}

/// Sends a contact form message to the academy. Replies go to whoever
/// filled in the form.
#[instrument(skip(mailer, message), fields(from = %message.email))]
pub async fn send_contact_email(
	mailer: &Mailer,
	config: &ContactConfig,
	message: ContactMessage,
) -> Result<(), ErrorType> {
	let recipient = config
		.recipient
		.parse::<Mailbox>()
		.map_err(|err| ErrorType::server_error(format!("invalid contact recipient: {}", err)))?;
	let email = message.email.to_string();
	let submitted_at = OffsetDateTime::now_utc().format(&Rfc3339)?;

	let text = format!(
		"Name: {}\nEmail: {}\n\n{}",
		message.name, email, message.message
	);
	mailer
		.send_template(
			constants::CONTACT_TEMPLATE,
			&ContactFormEmail {
				name: &message.name,
				email: &email,
				message: &message.message,
				submitted_at,
			},
			text,
			recipient,
			Some(Mailbox::new(Some(message.name.clone()), message.email)),
			&config.subject,
		)
		.await
}
