use crate::config::RegisterOptions;
use crate::palette::{AdvancedPalette, PaletteChannel};
use crate::palette_control::ResolvedPaletteControl;
use crate::registry::{ControlsError, ControlsRegistry, RegistryEvent, Values};
use crate::remote::{RemoteMessage, RemoteRole, SyncPort, SyncTransport, channel_name};
use crate::schema::Schema;
use crate::url_params::PageLocation;
use crate::value::ControlValue;

struct OpenChannel<P> {
    name: String,
    port: P,
}

pub struct Playground<T: SyncTransport> {
    registry: ControlsRegistry,
    location: PageLocation,
    role: RemoteRole,
    host_ready: bool,
    transport: T,
    channel: Option<OpenChannel<T::Port>>,
}

impl<T: SyncTransport> Playground<T> {
    pub fn new(location: PageLocation, transport: T) -> Self {
        let role = if location.requests_controller() {
            RemoteRole::Controller
        } else {
            RemoteRole::Host
        };
        let mut playground = Self {
            registry: ControlsRegistry::new(),
            location,
            role,
            host_ready: false,
            transport,
            channel: None,
        };
        log::info!("playground mounted as {}", role.as_str());
        playground.sync_channel();
        playground
    }

    pub fn registry(&self) -> &ControlsRegistry {
        &self.registry
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RegistryEvent) + 'static) {
        self.registry.subscribe(listener);
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    pub fn role(&self) -> RemoteRole {
        self.role
    }

    pub fn is_ready(&self) -> bool {
        self.host_ready
    }

    pub fn channel_name(&self) -> Option<&str> {
        self.channel.as_ref().map(|c| c.name.as_str())
    }

    pub fn value(&self, key: &str) -> Option<&ControlValue> {
        self.registry.value(key)
    }

    pub fn register_schema(&mut self, partial: Schema, options: &RegisterOptions) {
        self.registry.register_schema(partial, options);
        self.sync_channel();
        if self.role == RemoteRole::Host {
            if !self.host_ready {
                log::debug!("host ready, broadcasting initial state");
            }
            self.host_ready = true;
            self.post_state();
        }
    }

    pub fn set_value(
        &mut self,
        key: &str,
        value: impl Into<ControlValue>,
    ) -> Result<bool, ControlsError> {
        let value = value.into();
        let changed = self.registry.set_value(key, value.clone())?;
        if changed {
            self.post(&RemoteMessage::UpdateValue {
                key: key.to_string(),
                value,
                source: self.role,
            });
            self.state_changed();
        }
        Ok(changed)
    }

    pub fn restore_values(&mut self, values: Values) -> bool {
        let changed = self.registry.merge_values(values);
        if changed {
            self.state_changed();
        }
        changed
    }

    pub fn trigger_button(&mut self, key: &str) {
        match self.role {
            RemoteRole::Controller => self.post(&RemoteMessage::TriggerButton {
                key: key.to_string(),
            }),
            RemoteRole::Host => self.run_button(key),
        }
    }

    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(message) = self.next_inbound() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    pub fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            log::debug!("closing channel {}", channel.name);
            channel.port.close();
        }
    }

    pub fn palette_control(&self) -> Option<&ResolvedPaletteControl> {
        self.registry.config().add_advanced_palette_control.as_ref()
    }

    pub fn current_palette(&self) -> Option<AdvancedPalette> {
        self.palette_control()
            .map(|control| control.palette_from_values(self.registry.values()))
    }

    pub fn set_palette_channel(
        &mut self,
        section: &str,
        channel: PaletteChannel,
        value: f64,
    ) -> Result<bool, ControlsError> {
        let Some(control) = self.palette_control() else {
            return Ok(false);
        };
        let (key, clamped) = control.channel_update(section, channel, value);
        self.set_value(&key, clamped)
    }

    pub fn reset_palette(&mut self) -> Result<(), ControlsError> {
        let Some(control) = self.palette_control() else {
            return Ok(());
        };
        for (key, value) in control.reset_updates() {
            self.set_value(&key, value)?;
        }
        Ok(())
    }

    fn next_inbound(&mut self) -> Option<RemoteMessage> {
        self.channel.as_mut().and_then(|c| c.port.try_recv())
    }

    fn handle(&mut self, message: RemoteMessage) {
        log::debug!("[{}] received {}", self.role.as_str(), message.kind());
        match message {
            RemoteMessage::Hello { role } => {
                if self.role == RemoteRole::Host && role == RemoteRole::Controller && self.host_ready {
                    self.post_state();
                }
            }
            RemoteMessage::RequestState => {
                if self.role == RemoteRole::Host {
                    self.post_state();
                }
            }
            RemoteMessage::SyncState {
                values,
                schema,
                config,
            } => {
                let mut changed = self.registry.merge_values(values);
                if self.role == RemoteRole::Controller {
                    self.registry.replace_remote_schema(schema);
                    if let Some(config) = config {
                        changed |= self.registry.merge_config(&config);
                    }
                }
                if changed {
                    self.state_changed();
                }
            }
            RemoteMessage::UpdateValue { key, value, source } => {
                if source == self.role {
                    return;
                }
                match self.registry.set_value(&key, value) {
                    Ok(true) => self.state_changed(),
                    Ok(false) => {}
                    Err(err) => log::warn!("dropping remote update: {err}"),
                }
            }
            RemoteMessage::TriggerButton { key } => {
                if self.role == RemoteRole::Host {
                    self.run_button(&key);
                }
            }
        }
    }

    fn run_button(&self, key: &str) {
        match self.registry.button_action(key) {
            Some(action) => action.invoke(),
            None => log::debug!("no button callback registered for '{key}'"),
        }
    }

    fn state_changed(&mut self) {
        if self.role == RemoteRole::Host && self.host_ready {
            self.post_state();
        }
    }

    fn post_state(&mut self) {
        if self.role == RemoteRole::Host && !self.host_ready {
            return;
        }
        if self.channel.is_none() {
            return;
        }
        let message = RemoteMessage::SyncState {
            values: self.registry.values().clone(),
            schema: self.registry.remote_schema().clone(),
            config: Some(self.registry.config().clone()),
        };
        self.post(&message);
    }

    fn post(&mut self, message: &RemoteMessage) {
        if let Some(channel) = self.channel.as_mut() {
            log::debug!("[{}] posting {} on {}", self.role.as_str(), message.kind(), channel.name);
            channel.port.post(message);
        }
    }

    fn sync_channel(&mut self) {
        let config = self.registry.config();
        let wanted = config.remote_enabled() || self.role == RemoteRole::Controller;
        if !wanted {
            self.close();
            return;
        }

        let name = channel_name(config.remote_channel_id(), &self.location.path);
        if self.channel.as_ref().is_some_and(|c| c.name == name) {
            return;
        }
        self.close();

        let Some(port) = self.transport.open(&name) else {
            log::info!("cross-tab messaging unavailable; remote control disabled");
            return;
        };
        log::debug!("opened channel {name}");
        self.channel = Some(OpenChannel { name, port });

        self.post(&RemoteMessage::Hello { role: self.role });
        match self.role {
            RemoteRole::Controller => self.post(&RemoteMessage::RequestState),
            RemoteRole::Host => self.post_state(),
        }
    }
}

impl<T: SyncTransport> Drop for Playground<T> {
    fn drop(&mut self) {
        self.close();
    }
}
