use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use sphero_link::proto::{Command, HexBytes, InformationKind, Response, ResponseKind};
use sphero_link::stats::Stats;
use sphero_link::{LinkError, SerialLink};

use crate::cli::{ListenOpts, SerialOpts, StreamOpts};

pub fn run(ser: &SerialOpts, opts: ListenOpts) -> Result<()> {
    let link = SerialLink::open(&ser.port_config())?;
    listen_until_interrupted(&link, &opts)
}

pub fn run_stream(ser: &SerialOpts, opts: StreamOpts) -> Result<()> {
    let mask = opts.mask_bits()?;
    let link = SerialLink::connect(&ser.port_config())?;
    link.send(&Command::set_data_streaming(
        opts.divisor,
        opts.frames,
        mask,
        opts.count,
    ))
    .context("start streaming")?;
    log::info!(
        "streaming divisor={} frames={} mask=0x{:08X} count={}",
        opts.divisor,
        opts.frames,
        mask,
        opts.count
    );

    let res = listen_until_interrupted(&link, &opts.listen);
    // best effort; the link may already be gone
    if let Err(e) = link.send(&Command::set_data_streaming(opts.divisor, opts.frames, 0, 0)) {
        log::warn!("could not stop streaming: {}", e);
    }
    res
}

/// Print responses for `window`, then return.
pub fn listen_for(link: &SerialLink, window: Duration) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let timer = {
        let running = Arc::clone(&running);
        thread::spawn(move || {
            thread::sleep(window);
            running.store(false, Ordering::Relaxed);
        })
    };
    let res = link.listen(&running, |r| print_response(&r));
    running.store(false, Ordering::Relaxed);
    let _ = timer.join();
    res.context("listening for responses")
}

fn listen_until_interrupted(link: &SerialLink, opts: &ListenOpts) -> Result<()> {
    let running = setup_interrupt_handler();
    let mut stats = Stats::new();

    log::info!("listening, Ctrl-C to stop");
    let res = link.listen(&running, |r| {
        stats.record(&r);
        if !opts.quiet {
            print_response(&r);
        }
        stats.maybe_print(opts.stats);
    });
    stats.print();

    match res {
        Ok(()) => Ok(()),
        Err(LinkError::Disconnected) => {
            log::warn!("robot disconnected");
            Err(LinkError::Disconnected.into())
        }
        Err(e) => Err(e).context("receive loop"),
    }
}

/// Flag cleared by Ctrl-C.
fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    if let Err(e) = ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    }) {
        log::warn!("no Ctrl-C handler: {}", e);
    }

    running
}

fn print_response(r: &Response) {
    let flag = if r.is_corrupt() { " CORRUPT" } else { "" };
    match r.kind() {
        ResponseKind::Regular => println!(
            "<< {}/{} seq={} data=[{}]{}",
            r.kind(),
            r.code(),
            r.sequence_number().unwrap_or_default(),
            HexBytes(r.data()),
            flag
        ),
        ResponseKind::Information if r.information_kind() == InformationKind::Data => {
            let words: Vec<String> = r.data_words().map(|w| w.to_string()).collect();
            println!("<< DATA {}{}", words.join(" "), flag)
        }
        ResponseKind::Information => println!(
            "<< {}/{} data=[{}]{}",
            r.kind(),
            r.information_kind(),
            HexBytes(r.data()),
            flag
        ),
        ResponseKind::Unknown => println!("<< UNKNOWN [{}]", HexBytes(r.raw())),
    }
}
