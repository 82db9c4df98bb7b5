pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod role;
pub mod traits;

pub use config::BoardConfig;
pub use error::{BoardAction, BoardError};
pub use logging::{LogEntry, LogLevel, Loggable};
pub use result::BoardResult;
pub use role::ActorRole;
pub use traits::IdentityProvider;
