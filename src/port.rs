use serialport::{SerialPortInfo, SerialPortType};

/// A serial device the receiver can be attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialDevice {
    /// Name as written into a serial connection string, e.g. `ttyUSB0`.
    pub device: String,
    pub label: String,
}

pub fn list_devices() -> Result<Vec<SerialDevice>, serialport::Error> {
    let ports = serialport::available_ports()?;
    Ok(ports.iter().map(SerialDevice::from_info).collect())
}

impl SerialDevice {
    fn from_info(info: &SerialPortInfo) -> Self {
        let device = device_name(&info.port_name).to_string();
        let label = match info.port_type {
            SerialPortType::UsbPort(_) => "USB".to_string(),
            _ => device_label(&device).to_string(),
        };
        Self { device, label }
    }
}

/// Strip the `/dev/` prefix the way connection strings store devices.
pub fn device_name(port_name: &str) -> &str {
    port_name.strip_prefix("/dev/").unwrap_or(port_name)
}

pub fn device_label(device: &str) -> &str {
    match device {
        "ttyMFD2" => "UART",
        "ttyUSB0" => "USB",
        other => other,
    }
}

/// Baudrate to prefill when the user picks `device`.
pub fn default_baudrate(device: &str) -> &'static str {
    match device {
        "ttyMFD2" => "57600",
        _ => "115200",
    }
}
