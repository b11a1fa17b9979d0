//! Command implementations

mod serve;
mod template;
mod validate;

pub use serve::cmd_serve;
pub use template::cmd_template;
pub use validate::cmd_validate;
