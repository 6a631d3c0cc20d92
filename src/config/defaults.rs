use std::time::Duration;

use super::{DEFAULT_EXIT_DELAY, DEFAULT_TIMER};

pub(super) fn default_position() -> String {
    "top-right".to_string()
}

pub(super) const fn default_timer() -> Duration {
    DEFAULT_TIMER
}

pub(super) const fn default_exit_delay() -> Duration {
    DEFAULT_EXIT_DELAY
}

pub(super) const fn default_channel_capacity() -> usize {
    64
}
