pub mod conf;
pub mod decode;
pub mod encode;
pub mod fields;
pub mod ports;
pub mod remote;

use anyhow::Result;
use log::{info, warn};

use crate::cli::StreamEdit;
use rtkstr::{
    ConnectionDescriptor, Field, StreamKind,
    config::{ConfigSnapshot, StreamConfig},
    proto::ConfigMode,
};

/// Stream described on the command line. A file stream without a path gets the slot's default.
pub fn stream_from_edit(edit: &StreamEdit) -> Result<StreamConfig> {
    let mut descriptor = edit.descriptor()?;
    if edit.kind == StreamKind::File
        && descriptor.get(Field::Path).is_empty()
        && let Some(path) = edit.slot.default_file_path()
    {
        info!("[config] {}: using default log path {path}", edit.slot);
        descriptor.set(Field::Path, path);
    }
    warn_incomplete(&descriptor);
    let mut stream = StreamConfig::new(edit.slot, descriptor);
    stream.format = edit.path.format.clone();
    Ok(stream)
}

/// Apply `edit` to `snapshot` and return the stream as written.
pub fn apply_edit(snapshot: &mut ConfigSnapshot, edit: &StreamEdit) -> Result<StreamConfig> {
    let stream = stream_from_edit(edit)?;
    snapshot.apply_stream(&stream, edit.path.mode)?;
    Ok(stream)
}

pub fn warn_incomplete(desc: &ConnectionDescriptor) {
    let missing = desc.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        warn!("[config] {} stream without {}", desc.kind, names.join(", "));
    }
}

/// One line per stream: slot, kind, fields, format.
pub fn print_streams(snapshot: &ConfigSnapshot, mode: ConfigMode) {
    for stream in snapshot.streams(mode) {
        println!("{}", stream_line(&stream));
    }
}

pub fn stream_line(stream: &StreamConfig) -> String {
    let mut line = format!("{:<9}{:<10}", stream.slot.to_string(), stream.kind().as_str());
    line.push_str(&descriptor_fields(&stream.descriptor));
    if let Some(format) = &stream.format {
        line.push_str(&format!("  [{format}]"));
    }
    line.trim_end().to_string()
}

/// `field=value` pairs in the kind's field order, blanks skipped.
pub fn descriptor_fields(desc: &ConnectionDescriptor) -> String {
    desc.kind
        .fields()
        .iter()
        .filter(|spec| !desc.get(spec.field).is_empty())
        .map(|spec| format!("{}={}", spec.field, desc.get(spec.field)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PathOpts;
    use rtkstr::config::{ConfigEntry, StreamSlot};

    fn edit(slot: &str, kind: StreamKind, fields: Vec<(Field, String)>) -> StreamEdit {
        StreamEdit {
            slot: slot.parse().unwrap(),
            kind,
            fields,
            path: PathOpts {
                mode: ConfigMode::Rover,
                format: None,
            },
        }
    }

    #[test]
    fn file_stream_gets_default_path() {
        let s = stream_from_edit(&edit("logstr1", StreamKind::File, Vec::new())).unwrap();
        assert_eq!(s.descriptor.get(Field::Path), "/home/reach/logs/rov_%Y%m%d%h%M.ubx");

        let s = stream_from_edit(&edit(
            "logstr1",
            StreamKind::File,
            vec![(Field::Path, "/tmp/x.ubx".into())],
        ))
        .unwrap();
        assert_eq!(s.descriptor.get(Field::Path), "/tmp/x.ubx");
    }

    #[test]
    fn apply_edit_rewrites_snapshot() {
        let mut snap: ConfigSnapshot = [
            ConfigEntry::new("inpstr2-type", "off"),
            ConfigEntry::new("inpstr2-path", ""),
        ]
        .into_iter()
        .collect();
        let e = edit(
            "inpstr2",
            StreamKind::TcpClient,
            vec![(Field::Address, "10.0.0.5".into()), (Field::Port, "9000".into())],
        );
        apply_edit(&mut snap, &e).unwrap();
        assert_eq!(snap.value("inpstr2-type"), Some("tcpcli"));
        assert_eq!(snap.value("inpstr2-path"), Some("10.0.0.5:9000"));

        let stream = snap
            .stream("inpstr2".parse::<StreamSlot>().unwrap(), ConfigMode::Rover)
            .unwrap();
        assert_eq!(stream_line(&stream), "inpstr2  tcpcli    address=10.0.0.5 port=9000");
    }

    #[test]
    fn apply_edit_rejects_disallowed_kind() {
        let mut snap: ConfigSnapshot = [
            ConfigEntry::new("inpstr1-type", "serial"),
            ConfigEntry::new("inpstr1-path", ""),
        ]
        .into_iter()
        .collect();
        let e = edit("inpstr1", StreamKind::NtripServer, Vec::new());
        assert!(apply_edit(&mut snap, &e).is_err());
    }
}
