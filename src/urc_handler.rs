use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::pubsub::Subscriber;

use crate::connection::ConnectionState;
use crate::hal::types::{ContextId, ModemEvent, ServiceStatus, SignalInfo, Urc, UrcEvent};
use crate::state::{Event, StateMachine};
use crate::{URC_PUBLISHERS, URC_SUBSCRIBERS};

/// Turns modem URCs into state machine events and application callbacks.
pub struct UrcHandler<'a, 'cb, M: RawMutex, const URC_CAPACITY: usize> {
    sm: StateMachine<'a, 'cb, M>,
    urc_subscription: Subscriber<'a, M, Urc, URC_CAPACITY, URC_SUBSCRIBERS, URC_PUBLISHERS>,
}

impl<'a, 'cb, M: RawMutex, const URC_CAPACITY: usize> UrcHandler<'a, 'cb, M, URC_CAPACITY> {
    pub(crate) fn new(
        sm: StateMachine<'a, 'cb, M>,
        urc_subscription: Subscriber<'a, M, Urc, URC_CAPACITY, URC_SUBSCRIBERS, URC_PUBLISHERS>,
    ) -> Self {
        Self {
            sm,
            urc_subscription,
        }
    }

    pub async fn run(&mut self) -> ! {
        loop {
            let urc = self.urc_subscription.next_message_pure().await;
            self.handle_urc(urc);
        }
    }

    /// Process a single URC. Drivers that do not publish into the
    /// [`UrcChannel`](crate::UrcChannel) call this directly.
    pub fn handle_urc(&self, urc: Urc) {
        let kind = urc.kind();

        match urc {
            Urc::SignalStrengthChanged(info) => self.on_signal_strength(&info),
            _ if !self.sm.urc_adapters_registered() => {
                trace!("Dropping {:?} URC, no connection callback", kind);
            }
            Urc::NetworkRegistration { event, status } => {
                self.on_network_registration(event, &status)
            }
            Urc::PdnEvent { event, context_id } => self.on_pdn_event(event, context_id),
            Urc::ModemEvent(event) => self.on_modem_event(event),
        }
    }

    fn on_network_registration(&self, event: UrcEvent, status: &ServiceStatus) {
        match event {
            UrcEvent::NetworkPsRegistration => {
                if status.ps_registration_status.is_registered() {
                    self.sm.trigger(Event::Attached);
                } else {
                    self.sm.trigger(Event::Detached);
                }
            }
            UrcEvent::NetworkCsRegistration => {
                if !status.cs_registration_status.is_registered() {
                    self.sm.trigger(Event::Detached);
                }
            }
            _ => {
                error!("Unexpected network registration event {:?}", event);
                return;
            }
        }

        self.notify(self.sm.connection_state());
    }

    fn on_pdn_event(&self, event: UrcEvent, context_id: ContextId) {
        match event {
            UrcEvent::PdnActivated => {
                info!("PDN {} activated", context_id.0);
                self.sm.trigger(Event::DataActive);
            }
            UrcEvent::PdnDeactivated => {
                warn!("PDN {} deactivated", context_id.0);
                self.sm.trigger(Event::DataInactive);
            }
            _ => warn!("Unexpected PDN event {:?}", event),
        }

        self.notify(self.sm.connection_state());
    }

    fn on_modem_event(&self, event: ModemEvent) {
        match event {
            ModemEvent::BootupOrReboot => {
                if !self.sm.note_bootup() {
                    info!("Modem booted");
                    return;
                }

                warn!("Modem rebooted");
                self.sm.trigger(Event::PwrOff);
                self.notify(ConnectionState::Rebooted);
            }
            ModemEvent::PoweredDown => {
                warn!("Modem powered down");
                self.sm.trigger(Event::PwrOff);
                self.notify(ConnectionState::Off);
            }
            ModemEvent::FotaProgress(percent) => debug!("FOTA progress {}%", percent),
        }
    }

    fn on_signal_strength(&self, info: &SignalInfo) {
        if let Some(callback) = self.sm.callbacks().signal_strength_changed {
            callback(info);
        }
    }

    /// Called with the state lock released, so `callback` may query the
    /// manager.
    fn notify(&self, state: ConnectionState) {
        if let Some(callback) = self.sm.callbacks().connection_state_changed {
            callback(state);
        }
    }
}
