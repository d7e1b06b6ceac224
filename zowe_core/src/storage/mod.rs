pub mod config;
pub mod history;
pub mod profile;
pub mod registry;
pub mod secrets;
pub mod store;

pub use config::ConfigStore;
pub use history::HistoryStore;
pub use profile::{Credentials, Profile, ProfileKind};
pub use registry::{ProfileListing, ProfileRegistry, StoreRegistry};
pub use secrets::{KeyringSecrets, MemorySecrets, SecretStore};
pub use store::ProfileStore;
