use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown stream kind: {0}")]
pub struct UnknownKind(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

/// Transport type of one receiver stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StreamKind {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "serial")]
    Serial,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "tcpcli")]
    TcpClient,
    #[serde(rename = "tcpsvr")]
    TcpServer,
    #[serde(rename = "ntripcli")]
    NtripClient,
    #[serde(rename = "ntripsvr")]
    NtripServer,
    #[serde(rename = "ftp")]
    Ftp,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "bluetooth")]
    Bluetooth,
}

/// Named value slot of a connection descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Device,
    Baudrate,
    Path,
    Address,
    Port,
    Username,
    Password,
    Mount,
}

/// How a field should be rendered by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputClass {
    Text,
    Password,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub required: bool,
    pub input: InputClass,
}

impl FieldSpec {
    const fn new(field: Field, required: bool) -> Self {
        Self {
            field,
            required,
            input: field.input_class(),
        }
    }

    /// Input placeholder, e.g. "Address (required)".
    pub fn placeholder(&self) -> String {
        if self.required {
            format!("{} (required)", self.field.label())
        } else {
            self.field.label().to_string()
        }
    }
}

/* ---------- field tables ---------- */

const SERIAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(Field::Device, true),
    FieldSpec::new(Field::Baudrate, true),
];
const FILE_FIELDS: &[FieldSpec] = &[FieldSpec::new(Field::Path, true)];
const TCPCLI_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(Field::Address, true),
    FieldSpec::new(Field::Port, true),
];
const TCPSVR_FIELDS: &[FieldSpec] = &[FieldSpec::new(Field::Port, true)];
const NTRIP_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(Field::Username, false),
    FieldSpec::new(Field::Password, false),
    FieldSpec::new(Field::Address, true),
    FieldSpec::new(Field::Port, false),
    FieldSpec::new(Field::Mount, false),
];
const ADDRESS_FIELDS: &[FieldSpec] = &[FieldSpec::new(Field::Address, true)];

impl StreamKind {
    pub const ALL: [StreamKind; 10] = [
        StreamKind::Off,
        StreamKind::Serial,
        StreamKind::File,
        StreamKind::TcpClient,
        StreamKind::TcpServer,
        StreamKind::NtripClient,
        StreamKind::NtripServer,
        StreamKind::Ftp,
        StreamKind::Http,
        StreamKind::Bluetooth,
    ];

    /// Name used in the receiver configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::Off => "off",
            StreamKind::Serial => "serial",
            StreamKind::File => "file",
            StreamKind::TcpClient => "tcpcli",
            StreamKind::TcpServer => "tcpsvr",
            StreamKind::NtripClient => "ntripcli",
            StreamKind::NtripServer => "ntripsvr",
            StreamKind::Ftp => "ftp",
            StreamKind::Http => "http",
            StreamKind::Bluetooth => "bluetooth",
        }
    }

    /// Scheme written in front of a base-mode URL. Bluetooth is bridged to a
    /// local tcp client, so it shows up as `tcpcli`.
    pub fn scheme(self) -> &'static str {
        match self {
            StreamKind::Bluetooth => StreamKind::TcpClient.as_str(),
            k => k.as_str(),
        }
    }

    /// Ordered fields relevant to this kind. Total over the enum.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            StreamKind::Off | StreamKind::Bluetooth => &[],
            StreamKind::Serial => SERIAL_FIELDS,
            StreamKind::File => FILE_FIELDS,
            StreamKind::TcpClient => TCPCLI_FIELDS,
            StreamKind::TcpServer => TCPSVR_FIELDS,
            StreamKind::NtripClient | StreamKind::NtripServer => NTRIP_FIELDS,
            StreamKind::Ftp | StreamKind::Http => ADDRESS_FIELDS,
        }
    }

    pub fn accepts(self, field: Field) -> bool {
        self.fields().iter().any(|s| s.field == field)
    }
}

/// Field list the presentation layer renders for `kind`.
pub fn fields_for(kind: StreamKind) -> &'static [FieldSpec] {
    kind.fields()
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Device => "device",
            Field::Baudrate => "baudrate",
            Field::Path => "path",
            Field::Address => "address",
            Field::Port => "port",
            Field::Username => "username",
            Field::Password => "password",
            Field::Mount => "mount",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Device => "Device",
            Field::Baudrate => "Baudrate",
            Field::Path => "Path",
            Field::Address => "Address",
            Field::Port => "Port",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Mount => "Mount Point",
        }
    }

    pub const fn input_class(self) -> InputClass {
        match self {
            Field::Port | Field::Baudrate => InputClass::Numeric,
            Field::Password => InputClass::Password,
            _ => InputClass::Text,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Both the configuration names and the spelled-out forms are accepted.

impl FromStr for StreamKind {
    type Err = UnknownKind;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(StreamKind::Off),
            "serial" => Ok(StreamKind::Serial),
            "file" => Ok(StreamKind::File),
            "tcpcli" | "tcp-client" => Ok(StreamKind::TcpClient),
            "tcpsvr" | "tcp-server" => Ok(StreamKind::TcpServer),
            "ntripcli" | "ntrip-client" => Ok(StreamKind::NtripClient),
            "ntripsvr" | "ntrip-server" => Ok(StreamKind::NtripServer),
            "ftp" => Ok(StreamKind::Ftp),
            "http" => Ok(StreamKind::Http),
            "bluetooth" => Ok(StreamKind::Bluetooth),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

impl FromStr for Field {
    type Err = UnknownField;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "device" => Ok(Field::Device),
            "baudrate" | "baud" => Ok(Field::Baudrate),
            "path" => Ok(Field::Path),
            "address" => Ok(Field::Address),
            "port" => Ok(Field::Port),
            "username" | "user" => Ok(Field::Username),
            "password" => Ok(Field::Password),
            "mount" => Ok(Field::Mount),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_for_is_total() {
        for kind in StreamKind::ALL {
            let fields = fields_for(kind);
            match kind {
                StreamKind::Off | StreamKind::Bluetooth => assert!(fields.is_empty()),
                _ => assert!(!fields.is_empty(), "{kind} has no fields"),
            }
        }
    }

    #[test]
    fn ntrip_field_order() {
        let order: Vec<Field> = fields_for(StreamKind::NtripServer)
            .iter()
            .map(|s| s.field)
            .collect();
        assert_eq!(
            order,
            [
                Field::Username,
                Field::Password,
                Field::Address,
                Field::Port,
                Field::Mount
            ]
        );
    }

    #[test]
    fn input_classes_and_placeholders() {
        let serial = fields_for(StreamKind::Serial);
        assert_eq!(serial[1].input, InputClass::Numeric);
        assert_eq!(serial[0].placeholder(), "Device (required)");

        let ntrip = fields_for(StreamKind::NtripClient);
        assert_eq!(ntrip[1].input, InputClass::Password);
        assert_eq!(ntrip[4].placeholder(), "Mount Point");
    }

    #[test]
    fn kind_names_parse_back() {
        for kind in StreamKind::ALL {
            assert_eq!(kind.as_str().parse::<StreamKind>(), Ok(kind));
        }
        assert_eq!("tcp-server".parse(), Ok(StreamKind::TcpServer));
        assert_eq!(" NTRIPCLI ".parse(), Ok(StreamKind::NtripClient));
        assert!(matches!("udp".parse::<StreamKind>(), Err(UnknownKind(_))));
    }

    #[test]
    fn bluetooth_scheme_is_tcpcli() {
        assert_eq!(StreamKind::Bluetooth.scheme(), "tcpcli");
        assert_eq!(StreamKind::NtripServer.scheme(), "ntripsvr");
    }

    #[test]
    fn serde_uses_config_names() {
        let json = serde_json::to_string(&StreamKind::TcpServer).unwrap();
        assert_eq!(json, "\"tcpsvr\"");
        let field: Field = serde_json::from_str("\"mount\"").unwrap();
        assert_eq!(field, Field::Mount);
    }
}
