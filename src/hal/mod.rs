//! Contract towards the modem HAL.
//!
//! The HAL owns the AT command set of one specific modem. The manager only
//! needs the handful of queries and actions below, and a way to switch URC
//! reporting on and off. URCs themselves flow back either through a
//! [`UrcChannel`](crate::UrcChannel) or by calling
//! [`UrcHandler::handle_urc`](crate::UrcHandler::handle_urc) directly from
//! the driver.

pub mod types;

use types::{ContextId, PdnConfig, ServiceStatus, SimCardStatus, UrcKind};

/// Status codes of a failing HAL call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    Failure,
    BadParameter,
    NoMemory,
    Timeout,
    Unsupported,
    LibraryNotOpen,
    LibraryAlreadyOpen,
    InternalFailure,
    ModemNotReady,
}

#[allow(async_fn_in_trait)]
pub trait CellularHal {
    /// Byte stream towards the modem, e.g. a UART.
    type Comm: embedded_io_async::Read + embedded_io_async::Write;

    /// Open a session with the modem over `comm`.
    async fn init(&mut self, comm: Self::Comm) -> Result<(), HalError>;

    /// Close the session opened by [`CellularHal::init`].
    async fn cleanup(&mut self) -> Result<(), HalError>;

    async fn get_sim_card_status(&mut self) -> Result<SimCardStatus, HalError>;

    async fn get_service_status(&mut self) -> Result<ServiceStatus, HalError>;

    async fn set_pdn_config(
        &mut self,
        context_id: ContextId,
        config: &PdnConfig<'_>,
    ) -> Result<(), HalError>;

    async fn activate_pdn(&mut self, context_id: ContextId) -> Result<(), HalError>;

    async fn deactivate_pdn(&mut self, context_id: ContextId) -> Result<(), HalError>;

    async fn rf_on(&mut self) -> Result<(), HalError>;

    async fn rf_off(&mut self) -> Result<(), HalError>;

    /// Start (`enable`) or stop delivering URCs of the given kind.
    async fn set_urc_reporting(&mut self, kind: UrcKind, enable: bool) -> Result<(), HalError>;
}
