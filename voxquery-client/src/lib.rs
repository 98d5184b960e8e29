pub mod client;
pub mod debounce;
pub mod parse;
pub mod request;
pub mod retry;
pub mod session;

pub use client::ApiClient;
pub use debounce::Debouncer;
pub use retry::retry_with_backoff;
pub use session::{AuthRedirect, KeyringStore, MemoryStore, SessionStore};
