use anyhow::{Context, Result};
use log::info;
use std::time::Duration;

use crate::cli::{BackendOpts, RemoteCmd};
use crate::cmd::{apply_edit, print_streams, stream_line};
use rtkstr::{
    channel::{Channel, LineChannel},
    session::ConfigSession,
};

/// Read granularity of the socket; request deadlines are checked between reads.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(cmd: RemoteCmd) -> Result<()> {
    match cmd {
        RemoteCmd::Show { backend, mode } => {
            let mut session = connect(&backend)?;
            let snapshot = session
                .read_config(mode, backend.config_file.as_deref())
                .context("reading configuration")?;
            print_streams(&snapshot, mode);
            Ok(())
        }
        RemoteCmd::Set { backend, edit } => {
            let mode = edit.path.mode;
            let mut session = connect(&backend)?;
            let mut snapshot = session
                .read_config(mode, backend.config_file.as_deref())
                .context("reading configuration")?;
            let stream = apply_edit(&mut snapshot, &edit)
                .with_context(|| format!("updating {}", edit.slot))?;
            let request = snapshot.to_write_request(backend.config_file.as_deref());
            session
                .write_config(mode, &request)
                .context("writing configuration")?;
            info!("[remote] wrote {} ({} entries)", edit.slot, snapshot.len());
            println!("{}", stream_line(&stream));
            Ok(())
        }
    }
}

fn connect(opts: &BackendOpts) -> Result<ConfigSession<impl Channel>> {
    let poll = POLL_INTERVAL.min(Duration::from_millis(opts.timeout_ms.max(1)));
    let channel = LineChannel::connect(&opts.backend, poll)
        .with_context(|| format!("connecting to {}", opts.backend))?;
    let mut session = ConfigSession::new(channel, Duration::from_millis(opts.timeout_ms));
    session.announce()?;
    Ok(session)
}
