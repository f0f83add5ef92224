use anyhow::{Result, bail};

use crate::cli::DecodeOpts;
use rtkstr::proto::{ConfigMode, StreamPath, decode_path, parse_url};

pub fn run(opts: DecodeOpts) -> Result<()> {
    let path = decode(&opts)?;
    let desc = &path.descriptor;
    println!("kind      {}", desc.kind);
    for spec in desc.kind.fields() {
        println!("{:<10}{}", spec.field.as_str(), desc.get(spec.field));
    }
    if desc.kind.fields().is_empty() {
        println!("{:<10}{}", "raw", opts.value.trim());
    }
    if let Some(format) = &path.format {
        println!("format    {format}");
    }
    Ok(())
}

fn decode(opts: &DecodeOpts) -> Result<StreamPath> {
    match (opts.mode, opts.kind) {
        (mode, Some(kind)) => Ok(decode_path(mode, kind, &opts.value)),
        (ConfigMode::Base, None) => Ok(parse_url(&opts.value)?),
        (ConfigMode::Rover, None) => bail!("--kind is required to decode a rover string"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtkstr::proto::{Field, StreamKind};

    fn opts(value: &str, kind: Option<StreamKind>, mode: ConfigMode) -> DecodeOpts {
        DecodeOpts {
            value: value.to_string(),
            kind,
            mode,
        }
    }

    #[test]
    fn base_url_names_its_kind() {
        let p = decode(&opts("tcpsvr://:9000#rtcm3", None, ConfigMode::Base)).unwrap();
        assert_eq!(p.descriptor.kind, StreamKind::TcpServer);
        assert_eq!(p.descriptor.get(Field::Port), "9000");
        assert_eq!(p.format.as_deref(), Some("rtcm3"));
    }

    #[test]
    fn rover_needs_kind() {
        assert!(decode(&opts("ttyUSB0:115200", None, ConfigMode::Rover)).is_err());
        let p = decode(&opts("ttyUSB0:115200", Some(StreamKind::Serial), ConfigMode::Rover)).unwrap();
        assert_eq!(p.descriptor.get(Field::Baudrate), "115200");
    }
}
