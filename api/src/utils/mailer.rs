use std::time::Duration;

use handlebars::Handlebars;
use lettre::{
	message::{Mailbox, MultiPart},
	transport::{smtp::authentication::Credentials, stub::AsyncStubTransport},
	AsyncSmtpTransport,
	AsyncTransport,
	Message,
	Tokio1Executor,
};
use serde::Serialize;

use crate::prelude::*;

/// How mail leaves the API
pub enum MailTransport {
	/// Through an SMTP relay
	Smtp(AsyncSmtpTransport<Tokio1Executor>),
	/// Nowhere. Mail is rendered and logged, and kept in memory for tests.
	Stub(AsyncStubTransport),
}

/// Renders email templates and sends the result
pub struct Mailer {
	transport: MailTransport,
	from: Mailbox,
	templates: Handlebars<'static>,
}

impl Mailer {
	pub fn new(transport: MailTransport, from: Mailbox, templates: Handlebars<'static>) -> Self {
		Self {
			transport,
			from,
			templates,
		}
	}

	/// Creates the mailer described by the config. The SMTP connection is
	/// only opened when the first mail is sent.
	pub fn from_config(
		config: &EmailConfig,
		timeout: Option<Duration>,
		templates: Handlebars<'static>,
	) -> anyhow::Result<Self> {
		let from = config.from.parse::<Mailbox>()?;
		let transport = match &config.host {
			Some(host) => {
				info!("Sending mail through `{}:{}`", host, config.port);
				MailTransport::Smtp(
					AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
						.credentials(Credentials::new(
							config.username.clone(),
							config.password.clone(),
						))
						.port(config.port)
						.timeout(timeout)
						.build(),
				)
			}
			None => {
				warn!("No SMTP host configured. Mail will only be logged");
				MailTransport::Stub(AsyncStubTransport::new_ok())
			}
		};
		Ok(Self::new(transport, from, templates))
	}

	/// Renders a template with `data` and sends it as an HTML mail. `text` is
	/// the plain text alternative.
	#[instrument(skip(self, data, text), fields(to = %to))]
	pub async fn send_template<T>(
		&self,
		template: &str,
		data: &T,
		text: String,
		to: Mailbox,
		reply_to: Option<Mailbox>,
		subject: &str,
	) -> Result<(), ErrorType>
	where
		T: Serialize,
	{
		let html = self.templates.render(template, data)?;

		let mut builder = Message::builder()
			.from(self.from.clone())
			.to(to.clone())
			.subject(subject);
		if let Some(reply_to) = reply_to {
			builder = builder.reply_to(reply_to);
		}
		let message = builder.multipart(MultiPart::alternative_plain_html(text, html))?;

		match &self.transport {
			MailTransport::Smtp(transport) => {
				let response = transport.send(message).await?;
				if !response.is_positive() {
					error!("Error sending email to `{}`: {}", to, response.code());
					return Err(ErrorType::server_error(format!(
						"SMTP relay responded with {}",
						response.code()
					)));
				}
			}
			MailTransport::Stub(transport) => {
				debug!("Not sending `{}` to `{}`", subject, to);
				transport.send(message).await?;
			}
		}

		Ok(())
	}

	/// The raw messages handed to the stub transport
	#[cfg(test)]
	pub async fn stub_messages(&self) -> Vec<String> {
		match &self.transport {
			MailTransport::Stub(transport) => transport
				.messages()
				.await
				.into_iter()
				.map(|(_, message)| message)
				.collect(),
			MailTransport::Smtp(_) => Vec::new(),
		}
	}
}
