use anyhow::{Context, Result};

use rtkstr::port::{default_baudrate, list_devices};

pub fn run() -> Result<()> {
    let devices = list_devices().context("enumerating serial ports")?;
    if devices.is_empty() {
        eprintln!("no serial devices found");
    }
    for dev in devices {
        println!(
            "{:<14}{:<8}{}",
            dev.device,
            dev.label,
            default_baudrate(&dev.device)
        );
    }
    Ok(())
}
