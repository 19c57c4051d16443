use once_cell::sync::Lazy;
use regex::Regex;
use validator::{
  extras::{validate_email, validate_length},
  ValidateError,
};

pub const REQUIRED_MSG: &str = "This field is required.";
pub const BLANK_MSG: &str = "This field may not be blank.";
pub const NULL_MSG: &str = "This field may not be null.";
pub const INVALID_EMAIL_MSG: &str = "Enter a valid email address.";
pub const INVALID_USERNAME_MSG: &str =
  "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";

pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const NAME_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
  #[allow(clippy::expect_used)]
  Regex::new(r"^[\w.@+-]+$").expect("compile username regex")
});

pub fn is_valid_username(name: &str) -> bool {
  USERNAME_REGEX.is_match(name) && name.chars().count() <= USERNAME_MAX
}

/// Flattens a field read with `form::present`: a missing field is
/// `Ok(None)`, an explicit `null` is rejected.
#[allow(clippy::option_option)]
pub fn non_null<T>(value: &Option<Option<T>>) -> Result<Option<&T>, ValidateError> {
  match value {
    Some(None) => Err(ValidateError::message(NULL_MSG)),
    Some(Some(value)) => Ok(Some(value)),
    None => Ok(None),
  }
}

/// Checks a required text field: present, not blank and within
/// `max` characters.
pub fn required_text(value: Option<&str>, max: Option<usize>) -> Result<(), ValidateError> {
  let Some(value) = value else {
    return Err(ValidateError::message(REQUIRED_MSG));
  };
  present_text(value, max)
}

/// Same as [`required_text`] for a field that was sent.
pub fn present_text(value: &str, max: Option<usize>) -> Result<(), ValidateError> {
  if value.trim().is_empty() {
    return Err(ValidateError::message(BLANK_MSG));
  }
  if !validate_length(value, None, max) {
    let max = max.unwrap_or_default();
    return Err(ValidateError::message(format!(
      "Ensure this field has no more than {max} characters."
    )));
  }
  Ok(())
}

pub fn email(value: &str) -> Result<(), ValidateError> {
  present_text(value, Some(EMAIL_MAX))?;
  if validate_email(value.trim()) {
    Ok(())
  } else {
    Err(ValidateError::message(INVALID_EMAIL_MSG))
  }
}

pub fn required_email(value: Option<&str>) -> Result<(), ValidateError> {
  match value {
    Some(value) => email(value),
    None => Err(ValidateError::message(REQUIRED_MSG)),
  }
}

pub fn username(value: &str) -> Result<(), ValidateError> {
  present_text(value, Some(USERNAME_MAX))?;
  if is_valid_username(value) {
    Ok(())
  } else {
    Err(ValidateError::message(INVALID_USERNAME_MSG))
  }
}

pub fn password(value: &str) -> Result<(), ValidateError> {
  if value.trim().is_empty() {
    return Err(ValidateError::message(BLANK_MSG));
  }
  if !validate_length(value, Some(PASSWORD_MIN), None) {
    return Err(ValidateError::message(format!(
      "Ensure this field has at least {PASSWORD_MIN} characters."
    )));
  }
  if !validate_length(value, None, Some(PASSWORD_MAX)) {
    return Err(ValidateError::message(format!(
      "Ensure this field has no more than {PASSWORD_MAX} characters."
    )));
  }
  Ok(())
}
