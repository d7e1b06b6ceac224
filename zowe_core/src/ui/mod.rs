pub mod presentation;

pub use presentation::*;
