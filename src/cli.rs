use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use rtkstr::{
    config::StreamSlot,
    proto::{ConfigMode, Field, StreamKind},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "rtkstr", about = "Receiver stream configuration: connection strings, .conf files, backend")]
pub struct Cli {
    /// Verbose logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// List the inputs a stream kind needs
    Fields(FieldsOpts),
    /// Build a connection string from fields
    Encode(EncodeOpts),
    /// Split a connection string into fields
    Decode(DecodeOpts),
    /// Inspect or edit an RTKLIB .conf file
    #[command(subcommand)]
    Conf(ConfCmd),
    /// Talk to the configuration backend
    #[command(subcommand)]
    Remote(RemoteCmd),
    /// List serial devices usable by the serial kind
    Ports,
}

#[derive(Args, Debug, Clone)]
pub struct FieldsOpts {
    /// Stream kind (off, serial, file, tcpcli, tcpsvr, ntripcli, ntripsvr, ftp, http, bluetooth)
    #[arg(value_parser = parse_kind)]
    pub kind: StreamKind,
}

#[derive(Args, Debug, Clone)]
pub struct EncodeOpts {
    #[arg(value_parser = parse_kind)]
    pub kind: StreamKind,
    /// Field value, repeatable: -f address=caster.example.com
    #[arg(short = 'f', long = "field", value_parser = parse_field_pair)]
    pub fields: Vec<(Field, String)>,
    #[command(flatten)]
    pub path: PathOpts,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeOpts {
    /// Connection string (a kind://body#format URL with --mode base)
    pub value: String,
    /// Stream kind; required unless the base URL names it
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<StreamKind>,
    #[arg(long, default_value = "rover", value_parser = parse_mode)]
    pub mode: ConfigMode,
}

#[derive(Args, Debug, Clone)]
pub struct PathOpts {
    /// rover writes bare strings, base writes kind://body#format
    #[arg(long, default_value = "rover", value_parser = parse_mode)]
    pub mode: ConfigMode,
    /// Stream format (ubx, rtcm3, ...)
    #[arg(long)]
    pub format: Option<String>,
}

/// A stream edit shared by `conf set` and `remote set`.
#[derive(Args, Debug, Clone)]
pub struct StreamEdit {
    /// Stream slot, e.g. inpstr1, outstr2, logstr1, outstr
    #[arg(value_parser = parse_slot)]
    pub slot: StreamSlot,
    #[arg(value_parser = parse_kind)]
    pub kind: StreamKind,
    #[arg(short = 'f', long = "field", value_parser = parse_field_pair)]
    pub fields: Vec<(Field, String)>,
    #[command(flatten)]
    pub path: PathOpts,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfCmd {
    /// Print the streams of a .conf file
    Show {
        file: PathBuf,
        #[arg(long, default_value = "rover", value_parser = parse_mode)]
        mode: ConfigMode,
    },
    /// Rewrite one stream of a .conf file
    Set {
        file: PathBuf,
        #[command(flatten)]
        edit: StreamEdit,
        /// Write here instead of overwriting FILE
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the .conf files of a directory
    List { dir: PathBuf },
}

#[derive(Args, Debug, Clone)]
pub struct BackendOpts {
    /// Backend address (newline-delimited JSON over TCP)
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub backend: String,
    /// Response timeout in milliseconds
    #[arg(long, default_value_t = 5_000)]
    pub timeout_ms: u64,
    /// Named configuration profile instead of the active one
    #[arg(long)]
    pub config_file: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RemoteCmd {
    /// Read the configuration and print its streams
    Show {
        #[command(flatten)]
        backend: BackendOpts,
        #[arg(long, default_value = "rover", value_parser = parse_mode)]
        mode: ConfigMode,
    },
    /// Read the configuration, change one stream and write it back
    Set {
        #[command(flatten)]
        backend: BackendOpts,
        #[command(flatten)]
        edit: StreamEdit,
    },
}

/* ---------- value parsers ---------- */

fn parse_kind(s: &str) -> Result<StreamKind, String> {
    s.parse().map_err(|e: rtkstr::proto::UnknownKind| e.to_string())
}

fn parse_mode(s: &str) -> Result<ConfigMode, String> {
    s.parse()
        .map_err(|_| format!("mode must be 'rover' or 'base', got {s:?}"))
}

fn parse_slot(s: &str) -> Result<StreamSlot, String> {
    s.parse().map_err(|e: rtkstr::config::BadSlot| e.to_string())
}

fn parse_field_pair(s: &str) -> Result<(Field, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {s:?}"))?;
    let field = name.parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

impl StreamEdit {
    /// Descriptor built from the `-f` pairs; fields foreign to the kind are an error.
    pub fn descriptor(&self) -> anyhow::Result<rtkstr::ConnectionDescriptor> {
        descriptor_from(self.kind, &self.fields)
    }
}

pub fn descriptor_from(
    kind: StreamKind,
    fields: &[(Field, String)],
) -> anyhow::Result<rtkstr::ConnectionDescriptor> {
    let mut desc = rtkstr::ConnectionDescriptor::new(kind);
    for (field, value) in fields {
        if !desc.set(*field, value.as_str()) {
            return Err(anyhow!("{kind} has no {field} field"));
        }
    }
    Ok(desc)
}
