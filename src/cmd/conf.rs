use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::cli::{ConfCmd, StreamEdit};
use crate::cmd::{apply_edit, print_streams, stream_line};
use rtkstr::config::{available_configs, read_conf, write_conf};
use rtkstr::proto::ConfigMode;

pub fn run(cmd: ConfCmd) -> Result<()> {
    match cmd {
        ConfCmd::Show { file, mode } => show(&file, mode),
        ConfCmd::Set { file, edit, out } => set(&file, &edit, out.as_deref().unwrap_or(&file)),
        ConfCmd::List { dir } => {
            for name in available_configs(&dir)? {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn show(file: &Path, mode: ConfigMode) -> Result<()> {
    let snapshot = read_conf(file)?;
    print_streams(&snapshot, mode);
    Ok(())
}

fn set(file: &Path, edit: &StreamEdit, out: &Path) -> Result<()> {
    let mut snapshot = read_conf(file)?;
    let stream = apply_edit(&mut snapshot, edit)
        .with_context(|| format!("updating {} in {}", edit.slot, file.display()))?;
    write_conf(out, &snapshot)?;
    info!("[conf] {} -> {}", edit.slot, out.display());
    println!("{}", stream_line(&stream));
    Ok(())
}
