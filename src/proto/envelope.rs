use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::codec::{decode, encode};
use super::descriptor::ConnectionDescriptor;
use super::kind::StreamKind;

/// Which configuration flavour a path belongs to. Rover configs store bare
/// connection strings next to a `-type` parameter, base configs store
/// `kind://body#format` URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMode {
    #[default]
    Rover,
    Base,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("missing scheme in {0:?}")]
    MissingScheme(String),
    #[error("unknown scheme: {0}")]
    UnknownScheme(String),
}

/// A decoded path together with its stream format, if one was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPath {
    pub descriptor: ConnectionDescriptor,
    pub format: Option<String>,
}

pub fn encode_path(mode: ConfigMode, desc: &ConnectionDescriptor, format: Option<&str>) -> String {
    match mode {
        ConfigMode::Rover => encode(desc),
        ConfigMode::Base => encode_url(desc, format),
    }
}

/// Inverse of [`encode_path`]. In base mode a recognised scheme overrides `kind`.
pub fn decode_path(mode: ConfigMode, kind: StreamKind, s: &str) -> StreamPath {
    match mode {
        ConfigMode::Rover => StreamPath {
            descriptor: decode(kind, s),
            format: None,
        },
        ConfigMode::Base => {
            let (scheme, body, format) = split_url(s.trim());
            let kind = scheme
                .and_then(|sc| sc.parse::<StreamKind>().ok())
                .unwrap_or(kind);
            StreamPath {
                descriptor: decode(kind, body),
                format,
            }
        }
    }
}

pub fn encode_url(desc: &ConnectionDescriptor, format: Option<&str>) -> String {
    let mut out = format!("{}://{}", desc.kind.scheme(), encode(desc));
    if let Some(f) = format.map(str::trim)
        && !f.is_empty()
    {
        out.push('#');
        out.push_str(f);
    }
    out
}

/// Parse a base-mode URL when the kind is not known up front.
pub fn parse_url(s: &str) -> Result<StreamPath, EnvelopeError> {
    let (scheme, body, format) = split_url(s.trim());
    let scheme = scheme.ok_or_else(|| EnvelopeError::MissingScheme(s.to_string()))?;
    let kind = scheme
        .parse::<StreamKind>()
        .map_err(|_| EnvelopeError::UnknownScheme(scheme.to_string()))?;
    Ok(StreamPath {
        descriptor: decode(kind, body),
        format,
    })
}

/* ---------- helpers ---------- */

fn split_url(s: &str) -> (Option<&str>, &str, Option<String>) {
    let (scheme, rest) = match s.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, s),
    };
    match rest.rsplit_once('#') {
        Some((body, format)) if !format.trim().is_empty() => {
            (scheme, body, Some(format.trim().to_string()))
        }
        Some((body, _)) => (scheme, body, None),
        None => (scheme, rest, None),
    }
}

impl ConfigMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigMode::Rover => "rover",
            ConfigMode::Base => "base",
        }
    }
}

impl fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigMode {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rover" => Ok(ConfigMode::Rover),
            "base" => Ok(ConfigMode::Base),
            _ => Err(()),
        }
    }
}
