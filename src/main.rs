use anyhow::Result;
use clap::Parser;

mod cli;
mod rx;
mod tx;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Cli::parse();
    match args.cmd {
        cli::Cmd::Listen(opts) => rx::run(&args.ser, opts),
        cli::Cmd::Stream(opts) => rx::run_stream(&args.ser, opts),
        cmd => tx::run(&args.ser, args.listen_ms, cmd),
    }
}
