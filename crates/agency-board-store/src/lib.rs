pub mod drag;
pub mod pending;
pub mod store;
pub mod traits;

pub use drag::*;
pub use pending::*;
pub use store::*;
pub use traits::*;
