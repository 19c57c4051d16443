mod email;
mod length;
mod url;

pub use self::email::validate_email;
pub use self::length::validate_length;
pub use self::url::validate_url;
