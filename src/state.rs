use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::connection::ConnectionState;
use crate::hal::types::SignalInfo;

/// State of the modem as tracked by the connection manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemState {
    Off,
    /// Powered and responding, but not registered with the network.
    On,
    Registered,
    /// A PDN context is active.
    Connected,
    /// Airplane mode.
    RfOff,
    /// Firmware update in progress.
    Ota,
    /// Context not initialized. Never a resting state once `init` succeeded.
    Unknown,
}

/// Inputs of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    PwrOn,
    PwrOff,
    RfOn,
    RfOff,
    Attached,
    Detached,
    DataActive,
    DataInactive,
    Ota,
    OtaDone,
}

impl ModemState {
    /// Transition table. `None` means `event` is not expected in this state.
    pub const fn on_event(self, event: Event) -> Option<Self> {
        use Event as E;

        let next = match (self, event) {
            (Self::Off, E::PwrOn) => Self::On,
            // The registration URC may overtake the power on trigger
            (Self::Off, E::Attached) => Self::Registered,

            (Self::On, E::PwrOff) => Self::Off,
            (Self::On, E::RfOff) => Self::RfOff,
            (Self::On, E::Attached) => Self::Registered,

            (Self::Registered, E::PwrOff) => Self::Off,
            (Self::Registered, E::RfOff) => Self::RfOff,
            (Self::Registered, E::Detached) => Self::On,
            (Self::Registered, E::DataActive) => Self::Connected,

            (Self::Connected, E::PwrOff) => Self::Off,
            (Self::Connected, E::RfOff) => Self::RfOff,
            (Self::Connected, E::Detached) => Self::On,
            (Self::Connected, E::Ota) => Self::Ota,
            (Self::Connected, E::DataInactive) => Self::Registered,

            (Self::RfOff, E::PwrOn) => Self::RfOff,
            (Self::RfOff, E::PwrOff) => Self::Off,
            (Self::RfOff, E::RfOn) => Self::On,

            (Self::Ota, E::OtaDone) => Self::Off,
            (Self::Ota, E::PwrOff) => Self::Off,

            _ => return None,
        };

        Some(next)
    }
}

pub type ConnectionStateChangedCallback<'cb> = dyn Fn(ConnectionState) + Sync + 'cb;
pub type SignalStrengthChangedCallback<'cb> = dyn Fn(&SignalInfo) + Sync + 'cb;

#[derive(Clone, Copy, Default)]
pub(crate) struct Callbacks<'cb> {
    pub connection_state_changed: Option<&'cb ConnectionStateChangedCallback<'cb>>,
    pub signal_strength_changed: Option<&'cb SignalStrengthChangedCallback<'cb>>,
}

pub(crate) struct Shared<'cb> {
    modem_state: ModemState,
    lib_opened: bool,
    hal_opened: bool,
    first_boot_seen: bool,
    callbacks: Callbacks<'cb>,
}

impl<'cb> Shared<'cb> {
    const fn new(modem_state: ModemState) -> Self {
        Self {
            modem_state,
            lib_opened: false,
            hal_opened: false,
            first_boot_seen: false,
            callbacks: Callbacks {
                connection_state_changed: None,
                signal_strength_changed: None,
            },
        }
    }
}

pub struct State<'cb, M: RawMutex> {
    shared: Mutex<M, RefCell<Shared<'cb>>>,
}

impl<'cb, M: RawMutex> Default for State<'cb, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'cb, M: RawMutex> State<'cb, M> {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared::new(ModemState::Unknown))),
        }
    }
}

/// Handle on the shared state. All state changes go through
/// [`StateMachine::trigger`].
pub struct StateMachine<'a, 'cb, M: RawMutex> {
    shared: &'a Mutex<M, RefCell<Shared<'cb>>>,
}

impl<M: RawMutex> Clone for StateMachine<'_, '_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex> Copy for StateMachine<'_, '_, M> {}

impl<'a, 'cb, M: RawMutex> StateMachine<'a, 'cb, M> {
    pub fn new(state: &'a State<'cb, M>) -> Self {
        Self {
            shared: &state.shared,
        }
    }

    /// Feed `event` to the state machine and return the resulting state.
    ///
    /// Events without an entry for the current state leave it unchanged.
    pub fn trigger(&self, event: Event) -> ModemState {
        let (old_state, next) = self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            let old_state = s.modem_state;
            let next = old_state.on_event(event);
            if let Some(new_state) = next {
                if new_state != ModemState::Unknown {
                    s.modem_state = new_state;
                }
            }
            (old_state, next)
        });

        let new_state = match next {
            Some(new_state) => new_state,
            None => {
                warn!("Wrong event {:?} received in state {:?}", event, old_state);
                old_state
            }
        };

        info!(
            "State machine change old state = {:?}, new state = {:?}, trigger = {:?}",
            old_state,
            new_state,
            event
        );

        new_state
    }

    pub fn modem_state(&self) -> ModemState {
        self.shared.lock(|s| s.borrow().modem_state)
    }

    /// Application view of the current state, without any modem queries.
    pub fn connection_state(&self) -> ConnectionState {
        self.modem_state().into()
    }

    /// Start over from a zeroed context in `modem_state`.
    pub(crate) fn reset(&self, modem_state: ModemState) {
        self.shared.lock(|s| {
            *s.borrow_mut() = Shared::new(modem_state);
        })
    }

    pub(crate) fn is_opened(&self) -> bool {
        self.shared.lock(|s| s.borrow().lib_opened)
    }

    pub(crate) fn set_opened(&self, opened: bool) {
        self.shared.lock(|s| s.borrow_mut().lib_opened = opened)
    }

    pub(crate) fn is_hal_opened(&self) -> bool {
        self.shared.lock(|s| s.borrow().hal_opened)
    }

    pub(crate) fn set_hal_opened(&self, opened: bool) {
        self.shared.lock(|s| s.borrow_mut().hal_opened = opened)
    }

    /// Record a modem boot. Returns `true` if an earlier boot was already
    /// recorded, i.e. the modem rebooted.
    pub(crate) fn note_bootup(&self) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            core::mem::replace(&mut s.first_boot_seen, true)
        })
    }

    pub(crate) fn callbacks(&self) -> Callbacks<'cb> {
        self.shared.lock(|s| s.borrow().callbacks)
    }

    /// The network, PDN and modem URC adapters are registered exactly while a
    /// connection state callback is.
    pub(crate) fn urc_adapters_registered(&self) -> bool {
        self.callbacks().connection_state_changed.is_some()
    }

    pub(crate) fn set_connection_state_changed_callback(
        &self,
        callback: Option<&'cb ConnectionStateChangedCallback<'cb>>,
    ) {
        self.shared.lock(|s| {
            s.borrow_mut().callbacks.connection_state_changed = callback;
        })
    }

    pub(crate) fn set_signal_strength_changed_callback(
        &self,
        callback: Option<&'cb SignalStrengthChangedCallback<'cb>>,
    ) {
        self.shared.lock(|s| {
            s.borrow_mut().callbacks.signal_strength_changed = callback;
        })
    }
}
