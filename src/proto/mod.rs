use std::fmt;

pub mod catalog;
pub mod command;
pub mod parser;
pub mod response;

pub use command::{Command, CommandKind, MAX_PAYLOAD_LEN};
pub use parser::{ParseOutcome, encode_command, parse_response};
pub use response::{InformationKind, Response, ResponseCode, ResponseKind, checksum};

/// Space separated upper-case hex, for logs.
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
