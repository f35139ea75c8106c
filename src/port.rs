use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::time::Duration;

use crate::error::{LinkError, Result};

/// Where and how to open the serial link.
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial device, usually an RFCOMM binding such as `/dev/rfcomm0`.
    pub dev: String,
    pub baud: u32,
    pub rtscts: bool,
    /// Read timeout; bounds how long a receive loop takes to notice cancellation.
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            dev: "/dev/rfcomm0".into(),
            baud: 115_200,
            rtscts: false,
            timeout: Duration::from_millis(100),
        }
    }
}

pub fn open_port(cfg: &PortConfig) -> Result<Box<dyn SerialPort>> {
    let builder = serialport::new(&cfg.dev, cfg.baud)
        .timeout(cfg.timeout)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(if cfg.rtscts {
            FlowControl::Hardware
        } else {
            FlowControl::None
        });

    let port = builder.open().map_err(|source| LinkError::Open {
        path: cfg.dev.clone(),
        source,
    })?;
    log::info!("opened {} at {} baud", cfg.dev, cfg.baud);
    Ok(port)
}

/// Second handle on the same port, so reads and writes can be owned apart.
pub fn clone_port(port: &dyn SerialPort, cfg: &PortConfig) -> Result<Box<dyn SerialPort>> {
    port.try_clone().map_err(|source| LinkError::Open {
        path: cfg.dev.clone(),
        source,
    })
}
