//! Release and deploy notification for the error monitor, either through a
//! webhook or through the REST API.

pub mod env_files;
pub mod notifier;
pub mod release;

pub use env_files::load_env_files;
pub use notifier::{Notifier, NotifyError, NotifyOutcome, ReleaseStatus};
pub use release::{ApiTarget, Delivery, NotifyArgs, Release};
