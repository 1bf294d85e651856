//! Argument and parameter types exchanged with the modem HAL

use heapless::String;

pub use crate::registration::{RegistrationStatus, ServiceStatus};

/// PDN (PDP) context identifier, `<cid>` in `+CGDCONT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId(pub u8);

/// Indicates the radio access technology
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rat {
    /// • 0: GSM
    Gsm = 0,
    /// • 3: GSM/GPRS with EDGE availability
    Edge = 3,
    /// • 7: LTE
    Lte = 7,
    /// • 8: LTE Cat-M1
    CatM1 = 8,
    /// • 9: E-UTRAN (NB-S1 mode)
    NbIot = 9,
    /// No radio access technology in use, e.g. not camped on any cell.
    #[default]
    Invalid = 255,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimCardState {
    Removed,
    Inserted,
    #[default]
    Unknown,
}

/// SIM lock state, as reported by `+CPIN`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimCardLockState {
    /// • READY: MT is not pending for any password
    Ready,
    /// • SIM PIN: MT is waiting SIM PIN to be given
    Pin,
    /// • SIM PUK: MT is waiting SIM PUK to be given
    Puk,
    /// • SIM PIN2: MT is waiting SIM PIN2 to be given
    Pin2,
    /// • SIM PUK2: MT is waiting SIM PUK2 to be given
    Puk2,
    /// • PH-NET PIN: MT is waiting network personalization password to be given
    PhNetPin,
    /// • PH-NET PUK: MT is waiting network personalization unblocking password to be given
    PhNetPuk,
    /// • PH-NETSUB PIN: MT is waiting network subset personalization password to be
    /// given
    PhNetSubPin,
    /// • PH-NETSUB PUK: MT is waiting network subset personalization unblocking
    /// password to be given
    PhNetSubPuk,
    /// • PH-SP PIN: MT is waiting service provider personalization password to be given
    SpPin,
    /// • PH-SP PUK: MT is waiting service provider personalization unblocking password
    /// to be given
    SpPuk,
    /// • PH-CORP PIN: MT is waiting corporate personalization password to be given
    CorpPin,
    /// • PH-CORP PUK: MT is waiting corporate personalization unblocking password to be
    /// given
    CorpPuk,
    #[default]
    Unknown,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimCardStatus {
    pub card_state: SimCardState,
    pub lock_state: SimCardLockState,
}

impl SimCardStatus {
    /// SIM physically inserted and not waiting for any password.
    pub fn is_ready(&self) -> bool {
        self.card_state == SimCardState::Inserted && self.lock_state == SimCardLockState::Ready
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdnContextType {
    /// `"IP"`
    Ipv4,
    /// `"IPV6"`
    Ipv6,
    /// `"IPV4V6"`
    Ipv4v6,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdnAuth {
    #[default]
    None,
    Pap,
    Chap,
    PapOrChap,
}

/// Configuration of one PDN context, applied with `+CGDCONT` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdnConfig<'a> {
    pub context_type: PdnContextType,
    pub apn_name: &'a str,
    pub auth: PdnAuth,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

impl<'a> PdnConfig<'a> {
    pub const fn new(context_type: PdnContextType, apn_name: &'a str) -> Self {
        Self {
            context_type,
            apn_name,
            auth: PdnAuth::None,
            username: None,
            password: None,
        }
    }
}

/// Signal quality. `None` where the modem did not report a usable value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalInfo {
    /// dBm
    pub rssi: Option<i16>,
    /// dBm
    pub rsrp: Option<i16>,
    /// dB
    pub rsrq: Option<i16>,
    /// dB
    pub sinr: Option<i16>,
    pub ber: Option<i16>,
    pub bars: Option<u8>,
}

/// URC categories delivered by the HAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrcEvent {
    NetworkCsRegistration,
    NetworkPsRegistration,
    PdnActivated,
    PdnDeactivated,
    SignalChanged,
}

/// Modem lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemEvent {
    /// Modem printed its ready banner. Seen on first boot and after a crash.
    BootupOrReboot,
    PoweredDown,
    /// Firmware update progress, in percent.
    FotaProgress(u8),
}

/// Reporting classes that can be switched on and off in the HAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrcKind {
    NetworkRegistration,
    Pdn,
    ModemEvent,
    SignalStrength,
}

/// An unsolicited notification from the modem, as handed to the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    NetworkRegistration {
        event: UrcEvent,
        status: ServiceStatus,
    },
    PdnEvent {
        event: UrcEvent,
        context_id: ContextId,
    },
    ModemEvent(ModemEvent),
    SignalStrengthChanged(SignalInfo),
}

impl Urc {
    pub fn kind(&self) -> UrcKind {
        match self {
            Self::NetworkRegistration { .. } => UrcKind::NetworkRegistration,
            Self::PdnEvent { .. } => UrcKind::Pdn,
            Self::ModemEvent(_) => UrcKind::ModemEvent,
            Self::SignalStrengthChanged(_) => UrcKind::SignalStrength,
        }
    }
}

/// Operator name as reported by `+COPS`, long alphanumeric format.
pub type OperatorName = String<32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_ready_requires_inserted_and_unlocked() {
        let mut status = SimCardStatus {
            card_state: SimCardState::Inserted,
            lock_state: SimCardLockState::Ready,
        };
        assert!(status.is_ready());

        status.lock_state = SimCardLockState::Pin;
        assert!(!status.is_ready());

        status.lock_state = SimCardLockState::Ready;
        status.card_state = SimCardState::Removed;
        assert!(!status.is_ready());

        assert!(!SimCardStatus::default().is_ready());
    }

    #[test]
    fn urc_kind() {
        assert_eq!(
            Urc::PdnEvent {
                event: UrcEvent::PdnActivated,
                context_id: ContextId(1)
            }
            .kind(),
            UrcKind::Pdn
        );
        assert_eq!(
            Urc::ModemEvent(ModemEvent::PoweredDown).kind(),
            UrcKind::ModemEvent
        );
        assert_eq!(
            Urc::SignalStrengthChanged(SignalInfo::default()).kind(),
            UrcKind::SignalStrength
        );
    }
}
