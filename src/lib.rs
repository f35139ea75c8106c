//! Host side of the Sphero-style serial control protocol.
//!
//! - [`proto`]: command encoding, response framing, command catalog
//! - [`frame`]: reassembly of responses from a fragmented byte stream
//! - [`state`]: optimistic mirror of what was last commanded
//! - [`link`]: send/receive paths over any `Read`/`Write` pair or a serial port

pub mod error;
pub mod frame;
pub mod link;
pub mod port;
pub mod proto;
pub mod state;
pub mod stats;

pub use error::{LinkError, Result};
pub use frame::Reassembler;
pub use link::{Link, Receiver, Sender, SerialLink};
pub use port::PortConfig;
pub use proto::{Command, CommandKind, Response, ResponseCode, ResponseKind};
pub use state::DeviceState;
