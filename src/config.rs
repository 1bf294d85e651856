use embassy_time::Duration;

use crate::hal::types::ContextId;

/// Compile-time tuning of the connection manager.
///
/// Every constant has a default, so most applications can use
/// [`DefaultConfig`]. Override individual constants to match the modem and
/// network at hand:
///
/// ```ignore
/// struct SlowSimConfig;
///
/// impl ManagerConfig for SlowSimConfig {
///     const SIM_READY_RETRIES: u8 = 20;
/// }
/// ```
pub trait ManagerConfig {
    /// Number of SIM status polls during `init` before giving up waiting.
    const SIM_READY_RETRIES: u8 = 5;
    /// Delay between two SIM status polls.
    const SIM_READY_POLL_INTERVAL: Duration = Duration::from_millis(500);
    /// Delay between two service status polls while waiting for registration.
    const REGISTRATION_POLL_INTERVAL: Duration = Duration::from_millis(1000);

    const CONTEXT_ID_MIN: ContextId = ContextId(1);
    const CONTEXT_ID_MAX: ContextId = ContextId(16);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfig;

impl ManagerConfig for DefaultConfig {}

pub(crate) fn context_id_in_range<C: ManagerConfig>(context_id: ContextId) -> bool {
    (C::CONTEXT_ID_MIN..=C::CONTEXT_ID_MAX).contains(&context_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TestConfig;

    #[test]
    fn default_context_id_range() {
        assert!(!context_id_in_range::<DefaultConfig>(ContextId(0)));
        assert!(context_id_in_range::<DefaultConfig>(ContextId(1)));
        assert!(context_id_in_range::<DefaultConfig>(ContextId(16)));
        assert!(!context_id_in_range::<DefaultConfig>(ContextId(17)));
    }

    #[test]
    fn overridden_context_id_range() {
        assert!(context_id_in_range::<TestConfig>(ContextId(1)));
        assert!(!context_id_in_range::<TestConfig>(ContextId(9)));
    }
}
