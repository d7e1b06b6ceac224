pub mod dispatcher;
pub mod prompt;

pub use dispatcher::{CancelPoint, CommandDispatcher, Outcome};
pub use prompt::Prompt;
