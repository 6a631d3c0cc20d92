pub mod audio;
pub mod config;
pub mod error;
pub mod manager;
pub mod present;
pub mod queue;
pub mod telemetry;
pub mod types;
pub mod util;

pub use manager::{ToastHandle, ToastManager};
pub use types::{Notification, NotificationKind, Position, Slot, ToastId};

pub type Result<T> = std::result::Result<T, error::Error>;
