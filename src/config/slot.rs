use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proto::StreamKind;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a stream slot: {0}")]
pub struct BadSlot(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamDir {
    Inp,
    Out,
    Log,
}

/// One stream of the receiver configuration, e.g. `inpstr1` or the base
/// config's unnumbered `outstr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamSlot {
    pub dir: StreamDir,
    pub index: Option<u8>,
}

const INPUT_KINDS: &[StreamKind] = &[
    StreamKind::Off,
    StreamKind::Serial,
    StreamKind::File,
    StreamKind::TcpServer,
    StreamKind::TcpClient,
    StreamKind::NtripClient,
    StreamKind::Ftp,
    StreamKind::Http,
    StreamKind::Bluetooth,
];
const OUTPUT_KINDS: &[StreamKind] = &[
    StreamKind::Off,
    StreamKind::Serial,
    StreamKind::File,
    StreamKind::TcpServer,
    StreamKind::TcpClient,
    StreamKind::NtripServer,
    StreamKind::Bluetooth,
];

impl StreamSlot {
    pub fn new(dir: StreamDir, index: Option<u8>) -> Self {
        Self { dir, index }
    }

    /// `inpstr1-path` style parameter name.
    pub fn parameter(&self, suffix: &str) -> String {
        format!("{self}-{suffix}")
    }

    pub fn type_parameter(&self) -> String {
        self.parameter("type")
    }

    pub fn path_parameter(&self) -> String {
        self.parameter("path")
    }

    pub fn format_parameter(&self) -> String {
        self.parameter("format")
    }

    /// Split `outstr2-format` into its slot and `"format"`.
    pub fn split_parameter(parameter: &str) -> Option<(StreamSlot, &str)> {
        let (head, suffix) = parameter.split_once('-')?;
        let slot = head.parse().ok()?;
        Some((slot, suffix))
    }

    pub fn allowed_kinds(&self) -> &'static [StreamKind] {
        match self.dir {
            StreamDir::Inp => INPUT_KINDS,
            StreamDir::Out | StreamDir::Log => OUTPUT_KINDS,
        }
    }

    pub fn allows(&self, kind: StreamKind) -> bool {
        self.allowed_kinds().contains(&kind)
    }

    /// Where the receiver writes this stream when it is a file.
    pub fn default_file_path(&self) -> Option<&'static str> {
        match (self.dir, self.index) {
            (StreamDir::Log, Some(1)) => Some("/home/reach/logs/rov_%Y%m%d%h%M.ubx"),
            (StreamDir::Log, Some(2)) => Some("/home/reach/logs/ref_%Y%m%d%h%M.rtcm3"),
            (StreamDir::Out, Some(1)) => Some("/home/reach/logs/sol_%Y%m%d%h%M.pos"),
            (StreamDir::Out, None) => Some("/home/reach/logs/bas_%Y%m%d%h%M.rtcm3"),
            _ => None,
        }
    }
}

impl StreamDir {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamDir::Inp => "inp",
            StreamDir::Out => "out",
            StreamDir::Log => "log",
        }
    }
}

impl fmt::Display for StreamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}str", self.dir.as_str())?;
        if let Some(i) = self.index {
            write!(f, "{i}")?;
        }
        Ok(())
    }
}

impl FromStr for StreamSlot {
    type Err = BadSlot;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BadSlot(s.to_string());
        let lower = s.trim().to_ascii_lowercase();
        let (dir, rest) = if let Some(rest) = lower.strip_prefix("inpstr") {
            (StreamDir::Inp, rest)
        } else if let Some(rest) = lower.strip_prefix("outstr") {
            (StreamDir::Out, rest)
        } else if let Some(rest) = lower.strip_prefix("logstr") {
            (StreamDir::Log, rest)
        } else {
            return Err(bad());
        };
        let index = if rest.is_empty() {
            None
        } else {
            Some(rest.parse::<u8>().map_err(|_| bad())?)
        };
        Ok(StreamSlot { dir, index })
    }
}
