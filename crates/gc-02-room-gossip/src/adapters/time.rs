use shared_types::Timestamp;

use crate::ports::TimeSource;

/// Production time source using the system clock.
///
/// For tests use `FixedTimeSource` from the `test-utils` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
