use once_cell::sync::Lazy;
use regex::Regex;

const EMAIL_MAX: usize = 254;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
  #[allow(clippy::expect_used)]
  Regex::new(
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)+$",
  )
  .expect("compile email regex")
});

/// Syntactic email check. The host part must be a dotted domain name,
/// bare hosts and IP literals are rejected.
#[must_use]
pub fn validate_email(email: &str) -> bool {
  email.len() <= EMAIL_MAX && EMAIL_REGEX.is_match(email)
}
