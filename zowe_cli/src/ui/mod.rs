pub mod cli;
pub mod host;
pub mod picker;
pub mod terminal;
