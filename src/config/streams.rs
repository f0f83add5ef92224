use log::warn;
use thiserror::Error;

use super::entry::ConfigSnapshot;
use super::slot::StreamSlot;
use crate::proto::{ConfigMode, ConnectionDescriptor, StreamKind, decode_path, encode_path};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing parameter: {0}")]
    MissingParameter(String),
    #[error("{kind} is not available for {slot}")]
    KindNotAllowed { slot: StreamSlot, kind: StreamKind },
}

/// A decoded stream of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub slot: StreamSlot,
    pub descriptor: ConnectionDescriptor,
    pub format: Option<String>,
}

impl StreamConfig {
    pub fn new(slot: StreamSlot, descriptor: ConnectionDescriptor) -> Self {
        Self {
            slot,
            descriptor,
            format: None,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.descriptor.kind
    }
}

impl ConfigSnapshot {
    /// Decode the stream stored under `slot`, if the snapshot has its path.
    pub fn stream(&self, slot: StreamSlot, mode: ConfigMode) -> Option<StreamConfig> {
        let path = self.value(&slot.path_parameter())?;
        let kind = match self.value(&slot.type_parameter()) {
            Some(raw) => raw.parse::<StreamKind>().unwrap_or_else(|e| {
                warn!("[config] {slot}: {e}, treating as off");
                StreamKind::Off
            }),
            None => StreamKind::Off,
        };
        let decoded = decode_path(mode, kind, path);
        let format = decoded.format.or_else(|| {
            self.value(&slot.format_parameter())
                .filter(|f| !f.is_empty())
                .map(str::to_string)
        });
        Some(StreamConfig {
            slot,
            descriptor: decoded.descriptor,
            format,
        })
    }

    /// Every stream of the snapshot, in configuration order.
    pub fn streams(&self, mode: ConfigMode) -> Vec<StreamConfig> {
        self.stream_slots()
            .into_iter()
            .filter_map(|slot| self.stream(slot, mode))
            .collect()
    }

    /// Write `stream` back into its parameters.
    pub fn apply_stream(&mut self, stream: &StreamConfig, mode: ConfigMode) -> Result<(), ConfigError> {
        let slot = stream.slot;
        if !slot.allows(stream.kind()) {
            return Err(ConfigError::KindNotAllowed {
                slot,
                kind: stream.kind(),
            });
        }
        let path_param = slot.path_parameter();
        if self.get(&path_param).is_none() {
            return Err(ConfigError::MissingParameter(path_param));
        }
        let type_param = slot.type_parameter();
        if mode == ConfigMode::Rover && self.get(&type_param).is_none() {
            return Err(ConfigError::MissingParameter(type_param));
        }

        let path = encode_path(mode, &stream.descriptor, stream.format.as_deref());
        self.set_value(&path_param, path);
        // the type parameter is optional in base configs, the URL scheme carries it
        self.set_value(&type_param, stream.kind().as_str());
        if let Some(format) = &stream.format {
            self.set_value(&slot.format_parameter(), format.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::entry::ConfigEntry;
    use crate::config::slot::StreamDir;
    use crate::proto::Field;

    fn rover_snapshot() -> ConfigSnapshot {
        [
            ConfigEntry::new("inpstr1-type", "serial"),
            ConfigEntry::new("inpstr2-type", "ntripcli"),
            ConfigEntry::new("inpstr1-path", "ttyMFD1:230400:8:n:1:off"),
            ConfigEntry::new("inpstr2-path", "user:pw@caster.example.com:2101/MP"),
            ConfigEntry::new("inpstr1-format", "ubx"),
            ConfigEntry::new("inpstr2-format", "rtcm3"),
            ConfigEntry::new("outstr1-type", "off"),
            ConfigEntry::new("outstr1-path", ""),
            ConfigEntry::new("pos1-elmask", "15"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn rover_streams_decode() {
        let snap = rover_snapshot();
        let streams = snap.streams(ConfigMode::Rover);
        assert_eq!(streams.len(), 3);

        assert_eq!(streams[0].kind(), StreamKind::Serial);
        assert_eq!(streams[0].descriptor.get(Field::Device), "ttyMFD1");
        assert_eq!(streams[0].format.as_deref(), Some("ubx"));

        assert_eq!(streams[1].descriptor.get(Field::Mount), "MP");
        assert_eq!(streams[2].kind(), StreamKind::Off);
    }

    #[test]
    fn unknown_type_is_off() {
        let mut snap = rover_snapshot();
        snap.set_value("inpstr1-type", "udpsvr");
        let s = snap
            .stream(StreamSlot::new(StreamDir::Inp, Some(1)), ConfigMode::Rover)
            .unwrap();
        assert_eq!(s.kind(), StreamKind::Off);
        assert!(s.descriptor.fields.is_empty());
    }

    #[test]
    fn apply_rover_stream() {
        let mut snap = rover_snapshot();
        let slot = StreamSlot::new(StreamDir::Out, Some(1));
        let desc = ConnectionDescriptor::new(StreamKind::TcpServer).with(Field::Port, "9001");
        snap.apply_stream(&StreamConfig::new(slot, desc.clone()), ConfigMode::Rover)
            .unwrap();
        assert_eq!(snap.value("outstr1-type"), Some("tcpsvr"));
        assert_eq!(snap.value("outstr1-path"), Some(":9001"));

        let back = snap.stream(slot, ConfigMode::Rover).unwrap();
        assert_eq!(back.descriptor, desc);
    }

    #[test]
    fn apply_rejects_bad_kind_and_missing_slot() {
        let mut snap = rover_snapshot();
        let out1 = StreamSlot::new(StreamDir::Out, Some(1));
        let ntripcli = ConnectionDescriptor::new(StreamKind::NtripClient);
        assert!(matches!(
            snap.apply_stream(&StreamConfig::new(out1, ntripcli), ConfigMode::Rover),
            Err(ConfigError::KindNotAllowed { .. })
        ));

        let log1 = StreamSlot::new(StreamDir::Log, Some(1));
        let file = ConnectionDescriptor::new(StreamKind::File).with(Field::Path, "/tmp/x.ubx");
        assert_eq!(
            snap.apply_stream(&StreamConfig::new(log1, file), ConfigMode::Rover),
            Err(ConfigError::MissingParameter("logstr1-path".into()))
        );
    }

    #[test]
    fn base_stream_uses_url() {
        let mut snap: ConfigSnapshot = [
            ConfigEntry::new("inpstr-path", "serial://ttyMFD1:230400:8:n:1:off#ubx"),
            ConfigEntry::new("outstr-path", "file:///home/reach/logs/bas_%Y%m%d%h%M.rtcm3#rtcm3"),
        ]
        .into_iter()
        .collect();

        let inp = snap
            .stream(StreamSlot::new(StreamDir::Inp, None), ConfigMode::Base)
            .unwrap();
        assert_eq!(inp.kind(), StreamKind::Serial);
        assert_eq!(inp.format.as_deref(), Some("ubx"));

        let out_slot = StreamSlot::new(StreamDir::Out, None);
        let mut out = StreamConfig::new(
            out_slot,
            ConnectionDescriptor::new(StreamKind::NtripServer)
                .with(Field::Password, "pw")
                .with(Field::Address, "caster.example.com")
                .with(Field::Port, "2101")
                .with(Field::Mount, "BASE"),
        );
        out.format = Some("rtcm3".into());
        snap.apply_stream(&out, ConfigMode::Base).unwrap();
        assert_eq!(
            snap.value("outstr-path"),
            Some("ntripsvr://:pw@caster.example.com:2101/BASE#rtcm3")
        );
        assert_eq!(snap.stream(out_slot, ConfigMode::Base), Some(out));
    }
}
