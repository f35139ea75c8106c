use std::io;

use thiserror::Error;

use crate::proto::CommandKind;

pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("open {path}: {source}")]
    Open {
        path: String,
        source: serialport::Error,
    },
    #[error("write {kind} (seq {seq}): {source}")]
    Write {
        kind: CommandKind,
        seq: u8,
        source: io::Error,
    },
    #[error("read: {0}")]
    Read(#[source] io::Error),
    #[error("remote end closed the connection")]
    Disconnected,
}
