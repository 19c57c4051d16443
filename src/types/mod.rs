pub mod error;
pub mod form;
pub mod id;
pub mod money;
pub mod sensitive;

pub use error::Error;
pub use sensitive::Sensitive;
