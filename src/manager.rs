use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{Duration, Timer};

use crate::config::{context_id_in_range, ManagerConfig};
use crate::connection::ConnectionState;
use crate::error::Error;
use crate::hal::types::{ContextId, PdnConfig, UrcKind};
use crate::hal::{CellularHal, HalError};
use crate::state::{
    ConnectionStateChangedCallback, Event, ModemState, SignalStrengthChangedCallback,
    StateMachine,
};

/// URC reports backing the connection state callback.
const CONNECTION_URCS: [UrcKind; 3] = [
    UrcKind::NetworkRegistration,
    UrcKind::Pdn,
    UrcKind::ModemEvent,
];

/// Application facing half of the connection manager, see [`crate::new`].
pub struct CellularManager<'a, 'cb, M: RawMutex, H: CellularHal, C: ManagerConfig> {
    sm: StateMachine<'a, 'cb, M>,
    hal: &'a Mutex<M, H>,
    _config: C,
}

impl<'a, 'cb, M, H, C> CellularManager<'a, 'cb, M, H, C>
where
    M: RawMutex,
    H: CellularHal,
    C: ManagerConfig,
{
    pub(crate) fn new(sm: StateMachine<'a, 'cb, M>, hal: &'a Mutex<M, H>, config: C) -> Self {
        Self {
            sm,
            hal,
            _config: config,
        }
    }

    /// Power up the HAL over `comm` and wait for the SIM.
    ///
    /// A SIM that never becomes ready is logged, but does not fail the init.
    /// On failure everything set up so far is torn down again.
    pub async fn init(&self, comm: H::Comm) -> Result<(), Error> {
        if self.sm.is_opened() {
            error!("Cellular manager already opened");
            return Err(Error::Unknown);
        }

        self.sm.reset(ModemState::Off);

        if let Err(e) = self.open(comm).await {
            error!("Cellular manager init failed: {:?}", e);
            self.cleanup().await;
            return Err(e);
        }

        self.sm.set_opened(true);
        info!("Cellular manager opened");
        Ok(())
    }

    async fn open(&self, comm: H::Comm) -> Result<(), Error> {
        self.hal.lock().await.init(comm).await?;
        self.sm.set_hal_opened(true);

        self.sm.trigger(Event::PwrOn);
        self.wait_sim_ready().await;

        Ok(())
    }

    async fn wait_sim_ready(&self) {
        for attempt in 1..=C::SIM_READY_RETRIES {
            let status = self.hal.lock().await.get_sim_card_status().await;
            match status {
                Ok(status) if status.is_ready() => {
                    info!("SIM ready");
                    return;
                }
                Ok(status) => debug!("SIM not ready yet: {:?}", status),
                Err(e) => warn!("Failed to read SIM status: {:?}", e),
            }

            if attempt < C::SIM_READY_RETRIES {
                Timer::after(C::SIM_READY_POLL_INTERVAL).await;
            }
        }

        warn!("SIM not ready after {} polls", C::SIM_READY_RETRIES);
    }

    /// Tear down the manager and the HAL session. Safe to call at any time,
    /// any number of times.
    pub async fn cleanup(&self) {
        if self.sm.is_hal_opened() {
            let callbacks = self.sm.callbacks();
            let mut hal = self.hal.lock().await;

            if callbacks.connection_state_changed.is_some() {
                set_urc_reporting(&mut *hal, &CONNECTION_URCS, false).await;
            }
            if callbacks.signal_strength_changed.is_some() {
                set_urc_reporting(&mut *hal, &[UrcKind::SignalStrength], false).await;
            }

            if let Err(e) = hal.cleanup().await {
                warn!("HAL cleanup failed: {:?}", e);
            }
        }

        self.sm.reset(ModemState::Unknown);
        info!("Cellular manager closed");
    }

    /// Wait up to `timeout` for a packet switched registration, then
    /// configure and activate PDN context `context_id`.
    pub async fn connect(
        &self,
        context_id: ContextId,
        pdn_config: &PdnConfig<'_>,
        timeout: Duration,
    ) -> Result<(), Error> {
        self.check_context_id(context_id)?;

        self.wait_registered(timeout).await?;

        self.hal
            .lock()
            .await
            .set_pdn_config(context_id, pdn_config)
            .await?;

        self.activate_pdn(context_id).await?;
        self.sm.trigger(Event::DataActive);

        Ok(())
    }

    async fn wait_registered(&self, timeout: Duration) -> Result<(), Error> {
        let interval = C::REGISTRATION_POLL_INTERVAL;
        let attempts = timeout.as_ticks() / interval.as_ticks().max(1) + 1;

        for attempt in 1..=attempts {
            let status = self.hal.lock().await.get_service_status().await;
            match status {
                Ok(status) if status.is_attached() => {
                    info!("Registered on {:?}", status.rat);
                    self.sm.trigger(Event::Attached);
                    return Ok(());
                }
                Ok(status) => trace!("Not registered yet: {:?}", status),
                Err(e) => debug!("Failed to read service status: {:?}", e),
            }

            if attempt < attempts {
                Timer::after(interval).await;
            }
        }

        warn!("Network registration timed out");
        Err(Error::Timeout)
    }

    /// Activate with a single retry, deactivating in between.
    async fn activate_pdn(&self, context_id: ContextId) -> Result<(), Error> {
        let mut hal = self.hal.lock().await;

        if let Err(e) = hal.activate_pdn(context_id).await {
            warn!(
                "PDN {} activation failed: {:?}, retrying",
                context_id.0,
                e
            );

            let _ = hal.deactivate_pdn(context_id).await;
            hal.activate_pdn(context_id).await?;
        }

        info!("PDN {} active", context_id.0);
        Ok(())
    }

    pub async fn disconnect(&self, context_id: ContextId) -> Result<(), Error> {
        self.check_context_id(context_id)?;

        self.hal.lock().await.deactivate_pdn(context_id).await?;
        self.sm.trigger(Event::DataInactive);

        Ok(())
    }

    /// Current connection state.
    ///
    /// A plain disconnect is refined by asking the modem for the reason. The
    /// queries run after the state was read, so the result may already be
    /// stale when it is returned.
    pub async fn connection_state(&self) -> Result<ConnectionState, Error> {
        self.check_opened()?;

        let mut state = self.sm.connection_state();
        if state != ConnectionState::Disconnected {
            return Ok(state);
        }

        let mut hal = self.hal.lock().await;

        if let Ok(sim) = hal.get_sim_card_status().await {
            if !sim.is_ready() {
                state = ConnectionState::DisconnectedNoSim;
            }
        }

        if let Ok(service) = hal.get_service_status().await {
            if service.is_rejected() {
                state = ConnectionState::DisconnectedRegistrationRejected;
            }
        }

        Ok(state)
    }

    /// Switch the radio off. The state machine follows even if the modem
    /// refused.
    pub async fn airplane_mode_on(&self) -> Result<(), Error> {
        self.check_opened()?;

        let result = self.hal.lock().await.rf_off().await;
        self.sm.trigger(Event::RfOff);

        result.map_err(Error::from)
    }

    /// Switch the radio back on. The state machine follows even if the modem
    /// refused.
    pub async fn airplane_mode_off(&self) -> Result<(), Error> {
        self.check_opened()?;

        let result = self.hal.lock().await.rf_on().await;
        self.sm.trigger(Event::RfOn);

        result.map_err(Error::from)
    }

    /// Register `callback` for connection state changes, replacing any
    /// previous one. It is called from whatever context delivers the URCs.
    pub async fn set_connection_state_changed_callback(
        &self,
        callback: &'cb ConnectionStateChangedCallback<'cb>,
    ) -> Result<(), Error> {
        self.check_opened()?;

        // Store before enabling reports, or URCs arriving in between are dropped
        self.sm.set_connection_state_changed_callback(Some(callback));
        set_urc_reporting(&mut *self.hal.lock().await, &CONNECTION_URCS, true).await;

        Ok(())
    }

    pub async fn remove_connection_state_changed_callback(&self) -> Result<(), Error> {
        self.check_opened()?;

        set_urc_reporting(&mut *self.hal.lock().await, &CONNECTION_URCS, false).await;
        self.sm.set_connection_state_changed_callback(None);

        Ok(())
    }

    /// Register `callback` for signal strength reports. Fails with
    /// [`Error::Unsupported`] if the modem cannot report signal strength.
    pub async fn set_signal_strength_changed_callback(
        &self,
        callback: &'cb SignalStrengthChangedCallback<'cb>,
    ) -> Result<(), Error> {
        self.check_opened()?;

        let result = self
            .hal
            .lock()
            .await
            .set_urc_reporting(UrcKind::SignalStrength, true)
            .await;

        match result {
            Ok(()) => {}
            Err(HalError::Unsupported) => return Err(Error::Unsupported),
            Err(e) => warn!("Failed to enable signal strength reports: {:?}", e),
        }

        self.sm.set_signal_strength_changed_callback(Some(callback));
        Ok(())
    }

    pub async fn remove_signal_strength_changed_callback(&self) -> Result<(), Error> {
        self.check_opened()?;

        set_urc_reporting(
            &mut *self.hal.lock().await,
            &[UrcKind::SignalStrength],
            false,
        )
        .await;
        self.sm.set_signal_strength_changed_callback(None);

        Ok(())
    }

    /// Direct access to the HAL, e.g. for modem specific commands. State
    /// changes made behind the manager's back are not tracked.
    pub async fn cellular_handle(&self) -> Result<MutexGuard<'a, M, H>, Error> {
        if !self.sm.is_hal_opened() {
            return Err(Error::Unknown);
        }

        Ok(self.hal.lock().await)
    }

    /// Raw state machine state. Never talks to the modem.
    pub fn modem_state(&self) -> ModemState {
        self.sm.modem_state()
    }

    pub fn is_opened(&self) -> bool {
        self.sm.is_opened()
    }

    fn check_opened(&self) -> Result<(), Error> {
        if !self.sm.is_opened() {
            return Err(Error::LibNotOpened);
        }
        Ok(())
    }

    fn check_context_id(&self, context_id: ContextId) -> Result<(), Error> {
        self.check_opened()?;

        if !context_id_in_range::<C>(context_id) {
            error!("Invalid PDN context id {}", context_id.0);
            return Err(Error::BadParameter);
        }
        Ok(())
    }
}

async fn set_urc_reporting<H: CellularHal>(hal: &mut H, kinds: &[UrcKind], enable: bool) {
    for &kind in kinds {
        if let Err(e) = hal.set_urc_reporting(kind, enable).await {
            warn!(
                "Failed to set {:?} URC reporting to {}: {:?}",
                kind,
                enable,
                e
            );
        }
    }
}
