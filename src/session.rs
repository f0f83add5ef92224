use std::time::{Duration, Instant};

use log::{debug, warn};
use serde_json::{Value, json};
use thiserror::Error;

use crate::channel::{Channel, ChannelError, Message};
use crate::config::{ConfigSnapshot, WriteRequest};
use crate::proto::ConfigMode;

pub const CONNECT_EVENT: &str = "browser connected";

/// Pause between reads that returned nothing.
const IDLE_BACKOFF: Duration = Duration::from_millis(5);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("no {event:?} within {timeout:?}")]
    Timeout { event: String, timeout: Duration },
    #[error("bad {event:?} payload: {source}")]
    Payload {
        event: String,
        source: serde_json::Error,
    },
}

type Handler = Box<dyn FnMut(&Value)>;

/// Owns the backend channel for one front end.
///
/// Messages that arrive while a request is waiting for its response are handed
/// to the subscribers registered for their event.
pub struct ConfigSession<C> {
    channel: C,
    timeout: Duration,
    handlers: Vec<(String, Handler)>,
}

pub fn read_event(mode: ConfigMode) -> String {
    format!("read config {mode}")
}

pub fn current_event(mode: ConfigMode) -> String {
    format!("current config {mode}")
}

pub fn write_event(mode: ConfigMode) -> String {
    format!("write config {mode}")
}

impl<C: Channel> ConfigSession<C> {
    pub fn new(channel: C, timeout: Duration) -> Self {
        Self {
            channel,
            timeout,
            handlers: Vec::new(),
        }
    }

    pub fn announce(&mut self) -> Result<(), SessionError> {
        self.publish(CONNECT_EVENT, json!({ "data": "I'm connected" }))
    }

    pub fn publish(&mut self, event: &str, data: Value) -> Result<(), SessionError> {
        self.channel.send(&Message::new(event, data))?;
        Ok(())
    }

    pub fn subscribe(&mut self, event: impl Into<String>, handler: impl FnMut(&Value) + 'static) {
        self.handlers.push((event.into(), Box::new(handler)));
    }

    /// Dispatch whatever has already arrived. Returns the number of messages seen.
    pub fn poll(&mut self) -> Result<usize, SessionError> {
        let mut seen = 0;
        while let Some(msg) = self.channel.recv()? {
            self.dispatch(&msg);
            seen += 1;
        }
        Ok(seen)
    }

    /// Publish `event` and wait for `response`.
    pub fn request(&mut self, event: &str, data: Value, response: &str) -> Result<Value, SessionError> {
        self.publish(event, data)?;
        let deadline = Instant::now() + self.timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.channel.recv()? {
                Some(msg) if msg.event == response => return Ok(msg.data),
                Some(msg) => self.dispatch(&msg),
                None => std::thread::sleep(IDLE_BACKOFF.min(deadline - now)),
            }
        }
        warn!("[session] {event:?} got no {response:?} in {:?}", self.timeout);
        Err(SessionError::Timeout {
            event: response.to_string(),
            timeout: self.timeout,
        })
    }

    pub fn read_config(
        &mut self,
        mode: ConfigMode,
        config_file_name: Option<&str>,
    ) -> Result<ConfigSnapshot, SessionError> {
        let payload = match config_file_name {
            Some(name) => json!({ "config_file_name": name }),
            None => json!({}),
        };
        let response = current_event(mode);
        let data = self.request(&read_event(mode), payload, &response)?;
        let snapshot: ConfigSnapshot = serde_json::from_value(data).map_err(|source| {
            SessionError::Payload {
                event: response.clone(),
                source,
            }
        })?;
        debug!("[session] {response}: {} entries", snapshot.len());
        Ok(snapshot)
    }

    pub fn write_config(&mut self, mode: ConfigMode, request: &WriteRequest) -> Result<(), SessionError> {
        let event = write_event(mode);
        let data = serde_json::to_value(request).map_err(|source| SessionError::Payload {
            event: event.clone(),
            source,
        })?;
        self.publish(&event, data)
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    fn dispatch(&mut self, msg: &Message) {
        let mut handled = false;
        for (event, handler) in self.handlers.iter_mut() {
            if *event == msg.event {
                handler(&msg.data);
                handled = true;
            }
        }
        if !handled {
            debug!("[session] no subscriber for {:?}", msg.event);
        }
    }
}
