pub mod errors;
pub mod session;
pub mod transport;
pub mod zowe_cli;

#[cfg(feature = "ssh")]
pub mod ssh;

// Re-export the modules here for easy import elsewhere.
pub use errors::*;
pub use session::*;
pub use transport::*;
