//! Crate-internal logging macros
//!
//! `tracing` macros under `log_*` names. The crate never installs a
//! subscriber; applications choose where events go.

pub use tracing::{debug as log_debug, error as log_error, info as log_info, warn as log_warn};
