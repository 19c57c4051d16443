use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateError};

use super::present;
use crate::schema::User;
use crate::types::id::{marker::UserMarker, Id};
use crate::types::Sensitive;
use crate::util::validation::{self, non_null, REQUIRED_MSG};

#[derive(Debug, Deserialize, ToSchema)]
pub struct Signup {
  #[schema(value_type = String, example = "test")]
  pub username: Option<String>,
  #[schema(value_type = String, example = "test@test.com")]
  pub email: Option<String>,
  #[schema(value_type = String, format = Password)]
  pub password: Option<Sensitive<String>>,
}

impl Validate for Signup {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.check("username", match self.username.as_deref() {
      Some(username) => validation::username(username.trim()),
      None => Err(ValidateError::message(REQUIRED_MSG)),
    });
    fields.check("email", validation::required_email(self.email.as_deref()));
    fields.check("password", match self.password.as_ref() {
      Some(password) => validation::password(password.as_str()),
      None => Err(ValidateError::message(REQUIRED_MSG)),
    });
    fields.build().into_result()
  }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct Login {
  #[schema(value_type = String, example = "test")]
  pub username: Option<String>,
  #[schema(value_type = String, format = Password)]
  pub password: Option<Sensitive<String>>,
}

impl Validate for Login {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.check(
      "username",
      validation::required_text(self.username.as_deref(), None),
    );
    fields.check(
      "password",
      validation::required_text(self.password.as_ref().map(Sensitive::as_str), None),
    );
    fields.build().into_result()
  }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshToken {
  #[schema(value_type = String)]
  pub refresh: Option<Sensitive<String>>,
}

impl Validate for RefreshToken {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.check(
      "refresh",
      validation::required_text(self.refresh.as_ref().map(Sensitive::as_str), None),
    );
    fields.build().into_result()
  }
}

/// Partial profile update. Only the fields sent are checked, and none of
/// them may be `null`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[allow(clippy::option_option)]
pub struct UpdateProfile {
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = Option<String>)]
  pub username: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = Option<String>)]
  pub email: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  #[schema(value_type = Option<String>, format = Password)]
  pub password: Option<Option<Sensitive<String>>>,
}

impl Validate for UpdateProfile {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.check(
      "username",
      non_null(&self.username)
        .and_then(|value| value.map_or(Ok(()), |username| validation::username(username.trim()))),
    );
    fields.check(
      "email",
      non_null(&self.email).and_then(|value| value.map_or(Ok(()), |email| validation::email(email))),
    );
    fields.check(
      "password",
      non_null(&self.password).and_then(|value| {
        value.map_or(Ok(()), |password| validation::password(password.as_str()))
      }),
    );
    fields.build().into_result()
  }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
  #[schema(value_type = i64, example = 1)]
  pub id: Id<UserMarker>,
  pub username: String,
  pub email: String,
}

impl From<User> for UserResponse {
  fn from(value: User) -> Self {
    Self {
      id: value.id,
      username: value.username,
      email: value.email,
    }
  }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
  #[schema(value_type = String)]
  pub refresh: Sensitive<String>,
  #[schema(value_type = String)]
  pub access: Sensitive<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenResponse {
  #[schema(value_type = String)]
  pub access: Sensitive<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::validation::{BLANK_MSG, INVALID_EMAIL_MSG, NULL_MSG};

  fn messages<'a>(error: &'a ValidateError, field: &str) -> &'a [std::borrow::Cow<'static, str>] {
    error.get(field).map(ValidateError::messages).unwrap_or_default()
  }

  #[test]
  fn signup_requires_every_field() {
    let error = Signup {
      username: None,
      email: None,
      password: None,
    }
    .validate()
    .unwrap_err();

    assert_eq!(messages(&error, "username"), [REQUIRED_MSG]);
    assert_eq!(messages(&error, "email"), [REQUIRED_MSG]);
    assert_eq!(messages(&error, "password"), [REQUIRED_MSG]);
  }

  #[test]
  fn signup_checks_field_shapes() {
    let error = Signup {
      username: Some("test user".into()),
      email: Some("test".into()),
      password: Some("T123".into()),
    }
    .validate()
    .unwrap_err();

    assert!(error.get("username").is_some());
    assert_eq!(messages(&error, "email"), [INVALID_EMAIL_MSG]);
    assert_eq!(
      messages(&error, "password"),
      ["Ensure this field has at least 8 characters."]
    );

    let form = Signup {
      username: Some("testuser".into()),
      email: Some("test@test.com".into()),
      password: Some("Testpassword123".into()),
    };
    assert!(form.validate().is_ok());
  }

  #[test]
  fn login_rejects_blank_fields() {
    let error = Login {
      username: Some(String::new()),
      password: None,
    }
    .validate()
    .unwrap_err();

    assert_eq!(messages(&error, "username"), [BLANK_MSG]);
    assert_eq!(messages(&error, "password"), [REQUIRED_MSG]);
  }

  #[test]
  fn profile_update_only_checks_sent_fields() {
    assert!(UpdateProfile::default().validate().is_ok());

    let form = UpdateProfile {
      email: Some(Some("not-an-email".into())),
      ..Default::default()
    };
    let error = form.validate().unwrap_err();
    assert_eq!(messages(&error, "email"), [INVALID_EMAIL_MSG]);
    assert!(error.get("username").is_none());
  }

  #[test]
  fn profile_update_rejects_explicit_nulls() {
    let form: UpdateProfile =
      serde_json::from_value(serde_json::json!({ "username": null, "password": null })).unwrap();
    let error = form.validate().unwrap_err();
    assert_eq!(messages(&error, "username"), [NULL_MSG]);
    assert_eq!(messages(&error, "password"), [NULL_MSG]);
    assert!(error.get("email").is_none());
  }

  #[test]
  fn token_responses_expose_secrets_on_the_wire() {
    let response = TokenPairResponse {
      refresh: "refresh-token".into(),
      access: "access-token".into(),
    };
    assert_eq!(
      serde_json::to_value(&response).unwrap(),
      serde_json::json!({ "refresh": "refresh-token", "access": "access-token" })
    );
    assert!(!format!("{response:?}").contains("access-token"));
  }
}
