use crate::hal::types::{OperatorName, Rat};

/// 3GPP registration status, shared by the `+CREG`, `+CGREG` and `+CEREG`
/// families.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStatus {
    /// • 0: not registered, the MT is not currently searching a new operator to
    /// register to
    NotRegisteredNotSearching,
    /// • 1: registered, home network
    RegisteredHome,
    /// • 2: not registered, but the MT is currently searching a new operator to
    /// register to
    NotRegisteredSearching,
    /// • 3: registration denied
    RegistrationDenied,
    /// • 4: unknown (e.g. out of coverage)
    #[default]
    Unknown,
    /// • 5: registered, roaming
    RegisteredRoaming,
    /// • 6: registered for "SMS only", home network
    RegisteredSmsOnlyHome,
    /// • 7: registered for "SMS only", roaming
    RegisteredSmsOnlyRoaming,
    /// • 8: attached for emergency bearer services only
    AttachedEmergencyOnly,
}

impl From<u8> for RegistrationStatus {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::NotRegisteredNotSearching,
            1 => Self::RegisteredHome,
            2 => Self::NotRegisteredSearching,
            3 => Self::RegistrationDenied,
            5 => Self::RegisteredRoaming,
            6 => Self::RegisteredSmsOnlyHome,
            7 => Self::RegisteredSmsOnlyRoaming,
            8 => Self::AttachedEmergencyOnly,
            _ => Self::Unknown,
        }
    }
}

impl RegistrationStatus {
    /// Registered on the home network or roaming. SMS-only and emergency
    /// attachments do not count.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::RegisteredHome | Self::RegisteredRoaming)
    }
}

/// Snapshot of the modem's network service, as answered by the HAL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceStatus {
    pub rat: Rat,
    /// CSD (Circuit Switched Data) registration status.
    pub cs_registration_status: RegistrationStatus,
    /// PSD (Packet Switched Data) registration status.
    pub ps_registration_status: RegistrationStatus,
    /// 3GPP reject cause of the last CS registration attempt, 0 if none.
    pub cs_rejection_cause: u8,
    /// 3GPP reject cause of the last PS registration attempt, 0 if none.
    pub ps_rejection_cause: u8,
    pub operator_name: Option<OperatorName>,
}

impl ServiceStatus {
    /// Packet switched attach on a valid radio access technology.
    pub fn is_attached(&self) -> bool {
        self.rat != Rat::Invalid && self.ps_registration_status.is_registered()
    }

    /// The network turned down the last CS or PS registration attempt.
    pub fn is_rejected(&self) -> bool {
        self.cs_rejection_cause != 0 || self.ps_rejection_cause != 0
    }
}
