mod locate;
mod validate;

pub use locate::locate_command;
pub use validate::{ValidateArgs, validate_command};
