pub mod credentials;
pub mod error;
pub mod uploads;
pub mod validation;
