// tagbridge/src/transport/detect.rs
//! Auto-detection of the reader's serial port.
//!
//! Enumerates candidate USB serial ports and probes each with the wakeup +
//! GetFirmwareVersion exchange; the first port that answers like a PN532
//! wins. Manual configuration bypasses this entirely.

use crate::session::Session;
use crate::transport::serial::SerialTransport;
use crate::{Error, Result};
use std::time::Duration;

/// Find the serial port a PN532 reader is attached to.
pub fn detect_reader(baud_rate: u32, timeout: Duration) -> Result<String> {
    let ports = serialport::available_ports()?;
    let candidates: Vec<_> = ports
        .into_iter()
        .filter(|p| matches!(p.port_type, serialport::SerialPortType::UsbPort(_)))
        .collect();

    if candidates.is_empty() {
        log::warn!("no USB serial devices found");
        return Err(Error::DeviceNotFound);
    }
    log::info!("probing {} USB serial device(s) for a PN532", candidates.len());

    for info in candidates {
        if probe_port(&info.port_name, baud_rate, timeout) {
            log::info!("PN532 found on {}", info.port_name);
            return Ok(info.port_name);
        }
    }

    Err(Error::DeviceNotFound)
}

/// True when the device on `path` completes the reader initialization
/// sequence (wakeup, SAM configuration, firmware version check).
fn probe_port(path: &str, baud_rate: u32, timeout: Duration) -> bool {
    log::debug!("testing {}", path);
    match SerialTransport::open(path, baud_rate) {
        Ok(transport) => {
            let mut session = Session::new(Box::new(transport), timeout);
            match session.initialize() {
                Ok(()) => true,
                Err(e) => {
                    log::debug!("{} did not answer like a PN532: {}", path, e);
                    false
                }
            }
        }
        Err(e) => {
            log::debug!("cannot open {}: {}", path, e);
            false
        }
    }
}
