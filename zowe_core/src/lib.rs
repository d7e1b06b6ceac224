pub mod connections;
pub mod core;
pub mod storage;
pub mod ui;
pub mod utils;

// re‑export ergonomic entry points
pub use connections::{
    ApiRegister, CommandResponse, CommandTransport, Session, SessionManager, SessionProvider,
    ZoweError,
};
pub use core::{CommandDispatcher, Outcome, Prompt};
pub use storage::{ConfigStore, HistoryStore, Profile, ProfileKind, ProfileRegistry, ProfileStore};
pub use ui::{HostCapability, OutputLog, Presentation};
