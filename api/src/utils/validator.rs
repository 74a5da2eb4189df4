use once_cell::sync::Lazy;
use regex::Regex;

// Email regex: https://stackoverflow.com/a/201378
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
	Regex::new("^(?:[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*)@(?:(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?\\.)+[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)$")
		.expect("email regex should be valid")
});
// Optional leading +, then 7 to 15 digits. Spaces and dashes are stripped first
static PHONE_NUMBER_REGEX: Lazy<Regex> =
	Lazy::new(|| Regex::new("^\\+?[0-9]{7,15}$").expect("phone regex should be valid"));
// A PRN is a run of digits, optionally prefixed by letters
static PRN_REGEX: Lazy<Regex> =
	Lazy::new(|| Regex::new("^[A-Za-z]{0,8}[0-9]{1,20}$").expect("PRN regex should be valid"));

pub fn is_email_valid(email: &str) -> bool {
	email.len() <= 320 && EMAIL_REGEX.is_match(email)
}

pub fn is_phone_number_valid(phone: &str) -> bool {
	let phone = phone
		.chars()
		.filter(|ch| !matches!(ch, ' ' | '-'))
		.collect::<String>();
	PHONE_NUMBER_REGEX.is_match(&phone)
}

pub fn is_prn_valid(prn: &str) -> bool {
	PRN_REGEX.is_match(prn)
}

/// Returns the trimmed value, or `None` if nothing is left
pub fn required(value: &str) -> Option<&str> {
	Some(value.trim()).filter(|value| !value.is_empty())
}
