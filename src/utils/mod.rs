pub mod logging;
pub mod prompt;

pub use prompt::Prompter;
