//! Command implementations.

pub mod check;
pub mod clean;
pub mod config;
pub mod status;

pub use self::check::execute_check;
pub use self::clean::execute_clean;
pub use self::config::execute_config;
pub use self::status::execute_status;
