#![cfg_attr(not(test), no_std)]

//! Connection manager for cellular modems.
//!
//! Tracks the modem through power up, network registration and PDN
//! activation, driven by the application on one side and by URCs from the
//! modem driver on the other. The modem itself is reached through a
//! [`CellularHal`] implementation.
//!
//! ```ignore
//! static URC_CHANNEL: UrcChannel<CriticalSectionRawMutex, 8> = UrcChannel::new();
//!
//! let mut state = State::new(hal);
//! let (manager, mut urc_handler) = cellular_manager::new(&mut state, &URC_CHANNEL, DefaultConfig)?;
//!
//! join(urc_handler.run(), async {
//!     manager.init(uart).await?;
//!     manager.connect(ContextId(1), &PdnConfig::new(PdnContextType::Ipv4, "internet"), Duration::from_secs(60)).await?;
//! })
//! .await;
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
mod connection;
pub mod error;
pub mod hal;
mod manager;
pub mod registration;
pub mod state;
mod urc_handler;

#[cfg(test)]
mod test_helpers;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::pubsub::PubSubChannel;
use state::StateMachine;

pub use config::{DefaultConfig, ManagerConfig};
pub use connection::ConnectionState;
pub use error::Error;
pub use hal::types::*;
pub use hal::{CellularHal, HalError};
pub use manager::CellularManager;
pub use state::{
    ConnectionStateChangedCallback, Event, ModemState, SignalStrengthChangedCallback,
};
pub use urc_handler::UrcHandler;

pub(crate) const URC_SUBSCRIBERS: usize = 1;
pub(crate) const URC_PUBLISHERS: usize = 1;

/// Channel the modem driver publishes its [`Urc`]s into.
pub type UrcChannel<M, const URC_CAPACITY: usize> =
    PubSubChannel<M, Urc, URC_CAPACITY, URC_SUBSCRIBERS, URC_PUBLISHERS>;

/// Storage for one connection manager.
pub struct State<'cb, M: RawMutex, H: CellularHal> {
    shared: state::State<'cb, M>,
    hal: Mutex<M, H>,
}

impl<'cb, M: RawMutex, H: CellularHal> State<'cb, M, H> {
    pub fn new(hal: H) -> Self {
        Self {
            shared: state::State::new(),
            hal: Mutex::new(hal),
        }
    }
}

/// Create the connection manager living in `state`.
///
/// The returned [`UrcHandler`] must be run, or fed through
/// [`UrcHandler::handle_urc`], for the manager to follow the modem.
pub fn new<'a, 'cb, M, H, C, const URC_CAPACITY: usize>(
    state: &'a mut State<'cb, M, H>,
    urc_channel: &'a UrcChannel<M, URC_CAPACITY>,
    config: C,
) -> Result<
    (
        CellularManager<'a, 'cb, M, H, C>,
        UrcHandler<'a, 'cb, M, URC_CAPACITY>,
    ),
    Error,
>
where
    M: RawMutex,
    H: CellularHal,
    C: ManagerConfig,
{
    let urc_subscription = urc_channel.subscriber().map_err(|_| {
        error!("No free URC subscriber slot");
        Error::NoMemory
    })?;

    let state: &'a State<'cb, M, H> = state;
    let sm = StateMachine::new(&state.shared);

    Ok((
        CellularManager::new(sm, &state.hal, config),
        UrcHandler::new(sm, urc_subscription),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockHal, TestConfig};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn new_needs_a_free_subscriber_slot() {
        let (hal, _calls) = MockHal::new();
        let mut state = State::<NoopRawMutex, _>::new(hal);
        let urc_channel = UrcChannel::<NoopRawMutex, 4>::new();

        let _taken = urc_channel.subscriber().unwrap();

        assert!(matches!(
            new(&mut state, &urc_channel, TestConfig),
            Err(Error::NoMemory)
        ));
    }

    #[test]
    fn new_starts_uninitialized() {
        let (hal, calls) = MockHal::new();
        let mut state = State::<NoopRawMutex, _>::new(hal);
        let urc_channel = UrcChannel::<NoopRawMutex, 4>::new();

        let (manager, _urc_handler) = new(&mut state, &urc_channel, TestConfig).unwrap();

        assert!(!manager.is_opened());
        assert_eq!(manager.modem_state(), ModemState::Unknown);
        assert!(calls.lock().unwrap().is_empty());
    }
}
