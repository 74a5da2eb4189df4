use std::{ffi::OsStr, fs, path::Path};

use anyhow::Context;
use handlebars::{handlebars_helper, html_escape, Handlebars};

use crate::prelude::*;

/// Directory holding one folder per email, each with a `template.hbs`, and a
/// `shared` folder of partials
pub const EMAIL_TEMPLATE_FOLDER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/emails");

// helpers to use within handlebar templates. Output is escaped line by line,
// so templates use it with a triple stash.
handlebars_helper!(paragraphs: |text: str| text
	.split('\n')
	.map(str::trim)
	.filter(|line| !line.is_empty())
	.map(html_escape)
	.collect::<Vec<_>>()
	.join("<br>"));

/// Loads every email template and shared partial into a new registry. Strict
/// mode is on, so a template referring to a field its data does not have
/// fails to render instead of rendering blank.
pub fn initialize_handlebar_registry(folder: impl AsRef<Path>) -> anyhow::Result<Handlebars<'static>> {
	let folder = folder.as_ref();
	let mut handlebar = Handlebars::new();
	handlebar.set_strict_mode(true);
	handlebar.register_helper("paragraphs", Box::new(paragraphs));

	for entry in fs::read_dir(folder)
		.with_context(|| format!("unable to read templates from `{}`", folder.display()))?
	{
		let path = entry?.path();
		let Some(name) = path.file_name().and_then(OsStr::to_str).map(str::to_string) else {
			continue;
		};
		if !path.is_dir() {
			continue;
		}

		if name == "shared" {
			for entry in fs::read_dir(&path)? {
				let file_path = entry?.path();
				if file_path.is_file() && file_path.extension() == Some(OsStr::new("hbs")) {
					if let Some(partial_name) = file_path.file_stem().and_then(OsStr::to_str) {
						let content = fs::read_to_string(&file_path)?;
						handlebar.register_partial(partial_name, content)?;
					}
				}
			}
		} else {
			let template = path.join("template.hbs");
			if template.is_file() {
				handlebar
					.register_template_file(&name, &template)
					.with_context(|| format!("invalid email template `{}`", name))?;
				trace!("Registered email template `{}`", name);
			}
		}
	}

	Ok(handlebar)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn bundled_templates_render() {
		let registry = initialize_handlebar_registry(EMAIL_TEMPLATE_FOLDER).unwrap();
		let html = registry
			.render(
				constants::CONTACT_TEMPLATE,
				&json!({
					"name": "Jane",
					"email": "jane@x.com",
					"message": "Hello\nI would like to enrol",
					"submittedAt": "2026-01-01T00:00:00Z"
				}),
			)
			.unwrap();

		assert!(html.contains("jane@x.com"));
		assert!(html.contains("Hello<br>I would like to enrol"));
	}

	#[test]
	fn messages_are_escaped() {
		let registry = initialize_handlebar_registry(EMAIL_TEMPLATE_FOLDER).unwrap();
		let html = registry
			.render(
				constants::CONTACT_TEMPLATE,
				&json!({
					"name": "<b>Jane</b>",
					"email": "jane@x.com",
					"message": "<script>alert(1)</script>",
					"submittedAt": "2026-01-01T00:00:00Z"
				}),
			)
			.unwrap();

		assert!(!html.contains("<script>"));
		assert!(!html.contains("<b>Jane</b>"));
	}

	#[test]
	fn missing_fields_fail_to_render() {
		let registry = initialize_handlebar_registry(EMAIL_TEMPLATE_FOLDER).unwrap();
		assert!(registry
			.render(constants::CONTACT_TEMPLATE, &json!({ "name": "Jane" }))
			.is_err());
	}
}
