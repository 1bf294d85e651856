use std::sync::{Arc, Mutex, Once};

use embassy_time::Duration;
use env_logger::Env;

use crate::config::ManagerConfig;
use crate::hal::types::{
    ContextId, PdnConfig, Rat, RegistrationStatus, ServiceStatus, SimCardLockState,
    SimCardState, SimCardStatus, UrcKind,
};
use crate::hal::{CellularHal, HalError};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .is_test(true)
            .init();
    });
}

pub struct TestConfig;

impl ManagerConfig for TestConfig {
    const SIM_READY_POLL_INTERVAL: Duration = Duration::from_millis(1);
    const REGISTRATION_POLL_INTERVAL: Duration = Duration::from_millis(1);
    const CONTEXT_ID_MAX: ContextId = ContextId(8);
}

pub struct MockComm;

impl embedded_io_async::ErrorType for MockComm {
    type Error = core::convert::Infallible;
}

impl embedded_io_async::Read for MockComm {
    async fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl embedded_io_async::Write for MockComm {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalCall {
    Init,
    Cleanup,
    GetSimCardStatus,
    GetServiceStatus,
    SetPdnConfig(ContextId),
    ActivatePdn(ContextId),
    DeactivatePdn(ContextId),
    RfOn,
    RfOff,
    UrcReporting(UrcKind, bool),
}

pub type CallLog = Arc<Mutex<Vec<HalCall>>>;

/// Scripted HAL. Every call is appended to the shared [`CallLog`].
pub struct MockHal {
    calls: CallLog,
    pub init_result: Result<(), HalError>,
    pub sim_status: SimCardStatus,
    /// SIM polls answering "removed" before `sim_status` is reported.
    pub sim_ready_after: usize,
    pub service_status: ServiceStatus,
    /// Service polls answering "not registered" before `service_status` is
    /// reported.
    pub attach_after: usize,
    /// Activations failing before the first success.
    pub activate_failures: usize,
    pub set_pdn_result: Result<(), HalError>,
    pub deactivate_result: Result<(), HalError>,
    pub rf_on_result: Result<(), HalError>,
    pub rf_off_result: Result<(), HalError>,
    pub urc_reporting_result: Result<(), HalError>,
    pub signal_urc_supported: bool,
    /// Answer of the SIM and service status queries once they are past the
    /// `*_after` counts.
    pub status_query_result: Result<(), HalError>,
    /// Run on every `set_urc_reporting`, which then yields once so other
    /// tasks see what the hook did.
    pub on_urc_reporting: Option<Box<dyn FnMut(UrcKind, bool)>>,
    sim_polls: usize,
    service_polls: usize,
}

impl MockHal {
    pub fn new() -> (Self, CallLog) {
        let calls = CallLog::default();

        let hal = Self {
            calls: calls.clone(),
            init_result: Ok(()),
            sim_status: SimCardStatus {
                card_state: SimCardState::Inserted,
                lock_state: SimCardLockState::Ready,
            },
            sim_ready_after: 0,
            service_status: ServiceStatus {
                rat: Rat::Lte,
                cs_registration_status: RegistrationStatus::RegisteredHome,
                ps_registration_status: RegistrationStatus::RegisteredHome,
                ..Default::default()
            },
            attach_after: 0,
            activate_failures: 0,
            set_pdn_result: Ok(()),
            deactivate_result: Ok(()),
            rf_on_result: Ok(()),
            rf_off_result: Ok(()),
            urc_reporting_result: Ok(()),
            signal_urc_supported: true,
            status_query_result: Ok(()),
            on_urc_reporting: None,
            sim_polls: 0,
            service_polls: 0,
        };

        (hal, calls)
    }

    fn record(&self, call: HalCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CellularHal for MockHal {
    type Comm = MockComm;

    async fn init(&mut self, _comm: MockComm) -> Result<(), HalError> {
        self.record(HalCall::Init);
        self.init_result
    }

    async fn cleanup(&mut self) -> Result<(), HalError> {
        self.record(HalCall::Cleanup);
        Ok(())
    }

    async fn get_sim_card_status(&mut self) -> Result<SimCardStatus, HalError> {
        self.record(HalCall::GetSimCardStatus);
        self.sim_polls += 1;

        if self.sim_polls <= self.sim_ready_after {
            return Ok(SimCardStatus {
                card_state: SimCardState::Removed,
                lock_state: SimCardLockState::Unknown,
            });
        }
        self.status_query_result?;
        Ok(self.sim_status)
    }

    async fn get_service_status(&mut self) -> Result<ServiceStatus, HalError> {
        self.record(HalCall::GetServiceStatus);
        self.service_polls += 1;

        if self.service_polls <= self.attach_after {
            return Ok(ServiceStatus {
                rat: Rat::Lte,
                ps_registration_status: RegistrationStatus::NotRegisteredSearching,
                ..Default::default()
            });
        }
        self.status_query_result?;
        Ok(self.service_status.clone())
    }

    async fn set_pdn_config(
        &mut self,
        context_id: ContextId,
        _config: &PdnConfig<'_>,
    ) -> Result<(), HalError> {
        self.record(HalCall::SetPdnConfig(context_id));
        self.set_pdn_result
    }

    async fn activate_pdn(&mut self, context_id: ContextId) -> Result<(), HalError> {
        self.record(HalCall::ActivatePdn(context_id));

        if self.activate_failures > 0 {
            self.activate_failures -= 1;
            return Err(HalError::Failure);
        }
        Ok(())
    }

    async fn deactivate_pdn(&mut self, context_id: ContextId) -> Result<(), HalError> {
        self.record(HalCall::DeactivatePdn(context_id));
        self.deactivate_result
    }

    async fn rf_on(&mut self) -> Result<(), HalError> {
        self.record(HalCall::RfOn);
        self.rf_on_result
    }

    async fn rf_off(&mut self) -> Result<(), HalError> {
        self.record(HalCall::RfOff);
        self.rf_off_result
    }

    async fn set_urc_reporting(&mut self, kind: UrcKind, enable: bool) -> Result<(), HalError> {
        self.record(HalCall::UrcReporting(kind, enable));

        if let Some(hook) = self.on_urc_reporting.as_mut() {
            hook(kind, enable);
            embassy_futures::yield_now().await;
        }

        if kind == UrcKind::SignalStrength && !self.signal_urc_supported {
            return Err(HalError::Unsupported);
        }
        self.urc_reporting_result
    }
}
