mod memory;
mod message;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::{MemoryBus, MemoryPort};
pub use message::{CodecError, RemoteMessage, RemoteRole, decode, encode};
#[cfg(target_arch = "wasm32")]
pub use web::{BroadcastChannelPort, BroadcastChannelTransport, current_location};

pub const REMOTE_CONTROL_CHANNEL_PREFIX: &str = "playground-canvas-remote";

/// One end of a broadcast channel. Messages posted here reach every other
/// port on the same channel, never this one.
pub trait SyncPort {
    fn post(&mut self, message: &RemoteMessage);
    fn try_recv(&mut self) -> Option<RemoteMessage>;
    fn close(&mut self);
}

pub trait SyncTransport {
    type Port: SyncPort;

    fn open(&self, channel: &str) -> Option<Self::Port>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransport;

#[derive(Debug)]
pub enum NoPort {}

impl SyncPort for NoPort {
    fn post(&mut self, _message: &RemoteMessage) {
        match *self {}
    }

    fn try_recv(&mut self) -> Option<RemoteMessage> {
        match *self {}
    }

    fn close(&mut self) {
        match *self {}
    }
}

impl SyncTransport for NoTransport {
    type Port = NoPort;

    fn open(&self, _channel: &str) -> Option<NoPort> {
        None
    }
}

pub fn channel_name(channel_id: Option<&str>, page_path: &str) -> String {
    format!(
        "{REMOTE_CONTROL_CHANNEL_PREFIX}:{}",
        channel_id.unwrap_or(page_path)
    )
}
