use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use sphero_link::PortConfig;
use sphero_link::proto::catalog::streaming;

#[derive(Parser, Debug, Clone)]
#[command(name = "sphero-link", about = "Drive a Sphero-style robot over a serial (RFCOMM) link")]
pub struct Cli {
    #[command(flatten)]
    pub ser: SerialOpts,
    /// Milliseconds to print responses after sending a command (0 = don't wait)
    #[arg(long, default_value_t = 500)]
    pub listen_ms: u64,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Check the robot answers
    Ping,
    /// Request version information
    Version,
    /// Roll towards a heading (degrees) at a speed (0-255)
    Roll {
        #[arg(allow_hyphen_values = true)]
        heading: i32,
        speed: u8,
    },
    /// Stop the motors
    Stop,
    /// Set the RGB LED color
    Color { red: u8, green: u8, blue: u8 },
    /// Set the front (tail) LED brightness
    FrontLed { brightness: u8 },
    /// Enable or disable the stabilizer
    Stabilizer {
        /// Disable instead of enable
        #[arg(long, default_value_t = false)]
        off: bool,
    },
    /// Turn to a heading and make it the new zero
    Calibrate {
        #[arg(allow_hyphen_values = true)]
        heading: i32,
    },
    /// Set the Bluetooth name
    Rename { name: String },
    /// Start sensor streaming and print frames until Ctrl-C
    Stream(StreamOpts),
    /// Print every received packet until Ctrl-C
    Listen(ListenOpts),
}

#[derive(Args, Debug, Clone)]
pub struct SerialOpts {
    /// Serial device path
    #[arg(long, default_value = "/dev/rfcomm0")]
    pub dev: String,
    /// Baud rate
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
    /// Enable RTS/CTS
    #[arg(long, default_value_t = false)]
    pub rtscts: bool,
}

impl SerialOpts {
    pub fn port_config(&self) -> PortConfig {
        PortConfig {
            dev: self.dev.clone(),
            baud: self.baud,
            rtscts: self.rtscts,
            ..PortConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListenOpts {
    /// Stats print interval in seconds
    #[arg(long, default_value_t = 1.0)]
    pub stats: f64,
    /// Only print stats, not each packet
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StreamOpts {
    /// Divisor of the 400 Hz sample rate
    #[arg(long, default_value_t = 40)]
    pub divisor: u16,
    /// Samples per packet
    #[arg(long, default_value_t = 1)]
    pub frames: u16,
    /// Sensor mask: a name (e.g. "imu-filtered", "gyro-raw") or a number
    #[arg(long, default_value = "imu-filtered")]
    pub mask: String,
    /// Packets to stream, 0 = until stopped
    #[arg(long, default_value_t = 0)]
    pub count: u8,
    #[command(flatten)]
    pub listen: ListenOpts,
}

impl StreamOpts {
    pub fn mask_bits(&self) -> anyhow::Result<u32> {
        parse_mask(&self.mask)
    }
}

/// Accepts a mask name, a decimal number or a 0x-prefixed hex number.
pub fn parse_mask(s: &str) -> anyhow::Result<u32> {
    if let Some(bits) = streaming::by_name(s) {
        return Ok(bits);
    }
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|_| anyhow!("mask must be a sensor name, decimal or 0x-hex: {}", s))
}

pub fn listen_window(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
