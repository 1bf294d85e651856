use crate::hal::HalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Invalid argument, e.g. a PDN context id outside the configured range.
    BadParameter,
    /// No room for the manager context, e.g. no free URC subscriber slot.
    NoMemory,
    /// A bounded poll expired before the modem reached the wanted state.
    Timeout,
    /// The underlying HAL call failed. The HAL status is carried as is.
    Hal(HalError),
    /// Operation attempted before a successful `init`, or after `cleanup`.
    LibNotOpened,
    /// Feature not implemented by this HAL.
    Unsupported,
    /// Manager context missing or in an unexpected state.
    Unknown,
}

impl From<HalError> for Error {
    fn from(e: HalError) -> Self {
        Self::Hal(e)
    }
}
