use super::message::{RemoteMessage, decode, encode};
use super::{SyncPort, SyncTransport};
use crate::url_params::PageLocation;
use js_sys::Function;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{BroadcastChannel, MessageEvent};

#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastChannelTransport;

impl SyncTransport for BroadcastChannelTransport {
    type Port = BroadcastChannelPort;

    fn open(&self, channel: &str) -> Option<BroadcastChannelPort> {
        let inner = BroadcastChannel::new(channel).ok()?;
        let inbox: Rc<RefCell<VecDeque<String>>> = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&inbox);
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                sink.borrow_mut().push_back(text);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        inner.set_onmessage(Some(on_message.as_ref().unchecked_ref::<Function>()));

        Some(BroadcastChannelPort {
            inner,
            inbox,
            _on_message: on_message,
            closed: false,
        })
    }
}

pub struct BroadcastChannelPort {
    inner: BroadcastChannel,
    inbox: Rc<RefCell<VecDeque<String>>>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    closed: bool,
}

impl SyncPort for BroadcastChannelPort {
    fn post(&mut self, message: &RemoteMessage) {
        if self.closed {
            return;
        }
        let text = match encode(message) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("not posting {}: {err}", message.kind());
                return;
            }
        };
        if let Err(err) = self.inner.post_message(&JsValue::from_str(&text)) {
            log::warn!("postMessage failed: {err:?}");
        }
    }

    fn try_recv(&mut self) -> Option<RemoteMessage> {
        loop {
            let text = self.inbox.borrow_mut().pop_front()?;
            match decode(&text) {
                Ok(message) => return Some(message),
                Err(err) => log::warn!("ignoring message: {err}"),
            }
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.inner.set_onmessage(None);
        self.inner.close();
    }
}

impl Drop for BroadcastChannelPort {
    fn drop(&mut self) {
        self.close();
    }
}

pub fn current_location() -> Option<PageLocation> {
    let location = web_sys::window()?.location();
    let path = location.pathname().ok()?;
    let search = location.search().ok()?;
    Some(PageLocation::parse(&format!("{path}{search}")))
}
