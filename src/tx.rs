use anyhow::{Context, Result, bail};

use sphero_link::SerialLink;
use sphero_link::proto::Command;

use crate::cli::{Cmd, SerialOpts, listen_window};
use crate::rx::listen_for;

pub fn run(ser: &SerialOpts, listen_ms: u64, cmd: Cmd) -> Result<()> {
    let cfg = ser.port_config();
    let link = SerialLink::open(&cfg).with_context(|| format!("opening {}", cfg.dev))?;

    let seq = match cmd {
        Cmd::Ping => link.send(&Command::ping()),
        Cmd::Version => link.send(&Command::version()),
        Cmd::Roll { heading, speed } => link.roll(heading, speed),
        Cmd::Stop => link.stop(),
        Cmd::Color { red, green, blue } => link.set_led_color(red, green, blue),
        Cmd::FrontLed { brightness } => link.set_front_led_brightness(brightness),
        Cmd::Stabilizer { off } => link.enable_stabilizer(!off),
        Cmd::Calibrate { heading } => link.calibrate_heading(heading),
        Cmd::Rename { name } => link.send(&Command::set_bluetooth_name(&name)),
        other @ (Cmd::Stream(_) | Cmd::Listen(_)) => bail!("{:?} is a receive command", other),
    }
    .context("send")?;
    log::info!("sent seq={} state={:?}", seq, link.state());

    if let Some(window) = listen_window(listen_ms) {
        listen_for(&link, window)?;
    }
    Ok(())
}
