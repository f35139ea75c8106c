//! Send and receive paths over one duplex byte stream.
//!
//! The two halves are independent: [`Sender`] owns the write side, the
//! sequence counter and the [`DeviceState`] mirror; [`Receiver`] owns the read
//! side and the reassembly buffer. [`Link`] puts each half behind its own lock
//! so one thread can listen while others send.

use std::io::{self, ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serialport::SerialPort;

use crate::error::{LinkError, Result};
use crate::frame::Reassembler;
use crate::port::{PortConfig, clone_port, open_port};
use crate::proto::{Command, HexBytes, Response, ResponseKind};
use crate::state::DeviceState;

/// Bytes asked for per transport read.
pub const READ_CHUNK: usize = 256;

pub struct Sender<W> {
    writer: W,
    seq: u8,
    state: DeviceState,
}

impl<W: Write> Sender<W> {
    pub fn new(writer: W) -> Self {
        Self::with_sequence(writer, 0)
    }

    pub fn with_sequence(writer: W, seq: u8) -> Self {
        Self {
            writer,
            seq,
            state: DeviceState::default(),
        }
    }

    /// Sequence number the next command will carry.
    pub fn next_sequence(&self) -> u8 {
        self.seq
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Encode and write one command, returning the sequence number it used.
    ///
    /// The sequence number advances and the state mirror is updated even if
    /// the write fails; a failed send is not retried.
    pub fn send(&mut self, cmd: &Command) -> Result<u8> {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        let packet = cmd.to_packet(seq);
        self.state.apply(cmd);

        log::debug!(">> {}: {}", cmd.kind(), HexBytes(&packet));

        write_packet(&mut self.writer, &packet).map_err(|source| {
            log::error!("write {} failed: {}", cmd.kind(), source);
            LinkError::Write {
                kind: cmd.kind(),
                seq,
                source,
            }
        })?;
        Ok(seq)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Keep writing until the whole packet is out or the transport gives up.
fn write_packet<W: Write>(writer: &mut W, packet: &[u8]) -> io::Result<()> {
    let mut offset = 0;
    while offset < packet.len() {
        match writer.write(&packet[offset..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "transport accepted no bytes",
                ));
            }
            Ok(n) => offset += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    writer.flush()
}

pub struct Receiver<R> {
    reader: R,
    frames: Reassembler,
}

impl<R: Read> Receiver<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            frames: Reassembler::new(),
        }
    }

    /// Read, reassemble and dispatch responses until `running` goes false.
    ///
    /// `on_response` is called once per packet, in arrival order. Read
    /// timeouts just re-check `running`. End of stream returns
    /// [`LinkError::Disconnected`], any other read error [`LinkError::Read`].
    pub fn listen<F>(&mut self, running: &AtomicBool, mut on_response: F) -> Result<()>
    where
        F: FnMut(Response),
    {
        let mut chunk = [0u8; READ_CHUNK];
        while running.load(Ordering::Relaxed) {
            let n = match self.reader.read(&mut chunk) {
                Ok(0) => {
                    log::warn!("link: remote closed, {} bytes unparsed", self.frames.pending());
                    return Err(LinkError::Disconnected);
                }
                Ok(n) => n,
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    log::error!("link: read failed: {}", e);
                    return Err(LinkError::Read(e));
                }
            };

            self.frames.ingest(&chunk[..n]);
            for response in self.frames.drain() {
                log_response(&response);
                on_response(response);
            }
        }
        log::debug!("link: receive loop stopped");
        Ok(())
    }

    /// Bytes buffered towards a packet that has not fully arrived.
    pub fn pending(&self) -> usize {
        self.frames.pending()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

fn log_response(r: &Response) {
    match r.kind() {
        ResponseKind::Regular => {
            log::debug!("<< {}/{}: {}", r.kind(), r.code(), HexBytes(r.raw()))
        }
        ResponseKind::Information => {
            log::debug!(
                "<< {}/{}: {}",
                r.kind(),
                r.information_kind(),
                HexBytes(r.raw())
            )
        }
        ResponseKind::Unknown => log::debug!("<< UNKNOWN: {}", HexBytes(r.raw())),
    }
    if r.is_corrupt() && r.kind() != ResponseKind::Unknown {
        log::warn!(
            "<< corrupt {} packet: checksum {:02X} != {:02X}",
            r.kind(),
            r.claimed_checksum(),
            r.actual_checksum()
        );
    }
}

/// A connection to one robot: a send half and a receive half, each behind
/// its own lock.
pub struct Link<R, W> {
    rx: Mutex<Receiver<R>>,
    tx: Mutex<Sender<W>>,
}

pub type SerialLink = Link<Box<dyn SerialPort>, Box<dyn SerialPort>>;

impl SerialLink {
    /// Open the serial device with separate read and write handles.
    pub fn open(cfg: &PortConfig) -> Result<Self> {
        let writer = open_port(cfg)?;
        let reader = clone_port(&*writer, cfg)?;
        Ok(Link::new(reader, writer))
    }

    /// Open, then put the robot in a known state: abort any running macro
    /// and stop the motors.
    pub fn connect(cfg: &PortConfig) -> Result<Self> {
        let link = Self::open(cfg)?;
        link.send(&Command::abort_macro())?;
        link.stop()?;
        log::info!("connected to {}", cfg.dev);
        Ok(link)
    }
}

impl<R: Read, W: Write> Link<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            rx: Mutex::new(Receiver::new(reader)),
            tx: Mutex::new(Sender::new(writer)),
        }
    }

    pub fn send(&self, cmd: &Command) -> Result<u8> {
        self.tx.lock().send(cmd)
    }

    /// See [`Receiver::listen`]. Only one caller listens at a time.
    pub fn listen<F>(&self, running: &AtomicBool, on_response: F) -> Result<()>
    where
        F: FnMut(Response),
    {
        self.rx.lock().listen(running, on_response)
    }

    /// Last commanded state (see [`DeviceState`] for the caveats).
    pub fn state(&self) -> DeviceState {
        self.tx.lock().state()
    }

    /// Roll towards `heading` degrees (any integer, wrapped into 0..360).
    pub fn roll(&self, heading: i32, speed: u8) -> Result<u8> {
        self.send(&Command::roll(normalize_heading(heading), speed, false))
    }

    /// Change speed, keeping the last heading.
    pub fn set_speed(&self, speed: u8) -> Result<u8> {
        let mut tx = self.tx.lock();
        let heading = tx.state().heading;
        tx.send(&Command::roll(heading, speed, false))
    }

    /// Change heading, keeping the last speed.
    pub fn set_heading(&self, heading: i32) -> Result<u8> {
        let mut tx = self.tx.lock();
        let speed = tx.state().velocity;
        tx.send(&Command::roll(normalize_heading(heading), speed, false))
    }

    pub fn stop(&self) -> Result<u8> {
        let mut tx = self.tx.lock();
        let heading = tx.state().heading;
        tx.send(&Command::roll(heading, 0, true))
    }

    /// Turn in place to `heading`, then make it the new zero.
    pub fn calibrate_heading(&self, heading: i32) -> Result<u8> {
        let mut tx = self.tx.lock();
        tx.send(&Command::roll(normalize_heading(heading), 0, false))?;
        tx.send(&Command::calibrate(heading))
    }

    pub fn set_led_color(&self, red: u8, green: u8, blue: u8) -> Result<u8> {
        self.send(&Command::rgb_led(red, green, blue))
    }

    pub fn set_front_led_brightness(&self, brightness: u8) -> Result<u8> {
        self.send(&Command::front_led(brightness))
    }

    pub fn enable_stabilizer(&self, on: bool) -> Result<u8> {
        self.send(&Command::enable_stabilizer(on))
    }
}

fn normalize_heading(heading: i32) -> u16 {
    heading.rem_euclid(360) as u16
}
