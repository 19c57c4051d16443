pub mod figment;
pub mod validation;
pub mod validator;
