use anyhow::Result;
use log::debug;

use crate::cli::{EncodeOpts, descriptor_from};
use crate::cmd::warn_incomplete;
use rtkstr::proto::encode_path;

pub fn run(opts: EncodeOpts) -> Result<()> {
    let desc = descriptor_from(opts.kind, &opts.fields)?;
    debug!("[encode] {:?}", desc);
    warn_incomplete(&desc);
    println!("{}", encode_path(opts.path.mode, &desc, opts.path.format.as_deref()));
    Ok(())
}
