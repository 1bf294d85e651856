use crate::state::ModemState;

/// Connection state as reported to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Off,
    /// The modem crashed and came back up. Recover with `cleanup` followed by
    /// `init`.
    Rebooted,
    Registered,
    RfOff,
    Connected,
    Disconnected,
    DisconnectedNoSim,
    DisconnectedRegistrationRejected,
    DisconnectedFotaInProgress,
    Unknown,
}

impl From<ModemState> for ConnectionState {
    fn from(state: ModemState) -> Self {
        match state {
            ModemState::Off => Self::Off,
            ModemState::On => Self::Disconnected,
            ModemState::Registered => Self::Registered,
            ModemState::Connected => Self::Connected,
            ModemState::RfOff => Self::RfOff,
            ModemState::Ota => Self::DisconnectedFotaInProgress,
            ModemState::Unknown => Self::Unknown,
        }
    }
}
