use std::{
    io::{BufRead, BufReader, ErrorKind, Write},
    net::TcpStream,
    time::Duration,
};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One event on the message channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Message {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("channel closed by peer")]
    Closed,
}

/// Transport between the front end and the backend.
pub trait Channel {
    fn send(&mut self, msg: &Message) -> Result<(), ChannelError>;
    /// Next message, or `None` when nothing has arrived yet.
    fn recv(&mut self) -> Result<Option<Message>, ChannelError>;
}

/// Newline-delimited JSON messages over a reader/writer pair.
pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
    /// Bytes of a line not yet terminated; decoded once the line is complete.
    pending: Vec<u8>,
}

impl<R: BufRead, W: Write> LineChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            pending: Vec::new(),
        }
    }
}

impl LineChannel<BufReader<TcpStream>, TcpStream> {
    /// Connect over TCP. Reads give up after `poll` so callers can enforce deadlines.
    pub fn connect(addr: &str, poll: Duration) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(Some(poll))?;
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        debug!("[channel] connected to {addr}");
        Ok(Self::new(reader, stream))
    }
}

impl<R: BufRead, W: Write> Channel for LineChannel<R, W> {
    fn send(&mut self, msg: &Message) -> Result<(), ChannelError> {
        let mut line = serde_json::to_string(msg)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        debug!("[channel] -> {}", msg.event);
        Ok(())
    }

    fn recv(&mut self) -> Result<Option<Message>, ChannelError> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.trim_ascii().is_empty() => return Err(ChannelError::Closed),
            // final line without a newline
            Ok(0) => {}
            Ok(_) if !self.pending.ends_with(b"\n") => return Ok(None),
            Ok(_) => {}
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let line = std::mem::take(&mut self.pending);
        let line = line.trim_ascii();
        if line.is_empty() {
            return Ok(None);
        }
        let msg: Message = serde_json::from_slice(line)?;
        debug!("[channel] <- {}", msg.event);
        Ok(Some(msg))
    }
}
