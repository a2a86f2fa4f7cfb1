//! biasprobe-auth — Local account registry and persisted session.
//!
//! Accounts live in a key-value store (`users`), alongside a pointer to the
//! signed-in user (`user`). Passwords are kept as salted PBKDF2 hashes.

pub mod config;
pub mod error;
pub mod kv;
pub mod password;
pub mod store;

pub use config::{load_config, load_config_from, BiasprobeConfig};
pub use error::{AuthError, KvError};
pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use store::{AuthState, AuthStore, User};
