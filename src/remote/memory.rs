use super::message::{RemoteMessage, decode, encode};
use super::{SyncPort, SyncTransport};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

struct PortSlot {
    id: u64,
    channel: String,
    inbox: VecDeque<String>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    ports: Vec<PortSlot>,
}

impl BusInner {
    fn deliver(&mut self, channel: &str, from: Option<u64>, text: &str) {
        for slot in &mut self.ports {
            if slot.channel == channel && Some(slot.id) != from {
                slot.inbox.push_back(text.to_string());
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryBus {
    inner: Rc<RefCell<BusInner>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_port(&self, channel: &str) -> MemoryPort {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.ports.push(PortSlot {
            id,
            channel: channel.to_string(),
            inbox: VecDeque::new(),
        });
        MemoryPort {
            id,
            channel: channel.to_string(),
            bus: Rc::clone(&self.inner),
            closed: false,
        }
    }

    pub fn inject_raw(&self, channel: &str, text: &str) {
        self.inner.borrow_mut().deliver(channel, None, text);
    }

    pub fn port_count(&self, channel: &str) -> usize {
        self.inner
            .borrow()
            .ports
            .iter()
            .filter(|slot| slot.channel == channel)
            .count()
    }
}

impl SyncTransport for MemoryBus {
    type Port = MemoryPort;

    fn open(&self, channel: &str) -> Option<MemoryPort> {
        Some(self.open_port(channel))
    }
}

pub struct MemoryPort {
    id: u64,
    channel: String,
    bus: Rc<RefCell<BusInner>>,
    closed: bool,
}

impl MemoryPort {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn drain(&mut self) -> Vec<RemoteMessage> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl SyncPort for MemoryPort {
    fn post(&mut self, message: &RemoteMessage) {
        if self.closed {
            return;
        }
        match encode(message) {
            Ok(text) => self
                .bus
                .borrow_mut()
                .deliver(&self.channel, Some(self.id), &text),
            Err(err) => log::warn!("not posting {}: {err}", message.kind()),
        }
    }

    fn try_recv(&mut self) -> Option<RemoteMessage> {
        if self.closed {
            return None;
        }
        loop {
            let text = {
                let mut bus = self.bus.borrow_mut();
                let slot = bus.ports.iter_mut().find(|slot| slot.id == self.id)?;
                slot.inbox.pop_front()?
            };
            match decode(&text) {
                Ok(message) => return Some(message),
                Err(err) => log::warn!("ignoring message on {}: {err}", self.channel),
            }
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.bus.borrow_mut().ports.retain(|slot| slot.id != self.id);
    }
}

impl Drop for MemoryPort {
    fn drop(&mut self) {
        self.close();
    }
}
