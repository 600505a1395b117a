//! Startup and shutdown hooks for infrastructure services.
//!
//! ```text
//! ConfigService → Container → Modules → OnModuleInit → serve
//!                                                        ↓
//!                          OnModuleDestroy ← shutdown_signal()
//! ```

mod error;
mod manager;
mod shutdown;
mod traits;

pub use error::{LifecycleError, Result};
pub use manager::LifecycleManager;
pub use shutdown::shutdown_signal;
pub use traits::{OnModuleDestroy, OnModuleInit};
