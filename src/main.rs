use anyhow::Result;
use clap::Parser;

mod cli;
mod cmd;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.debug);
    match args.cmd {
        cli::Cmd::Fields(opts) => cmd::fields::run(opts),
        cli::Cmd::Encode(opts) => cmd::encode::run(opts),
        cli::Cmd::Decode(opts) => cmd::decode::run(opts),
        cli::Cmd::Conf(c) => cmd::conf::run(c),
        cli::Cmd::Remote(c) => cmd::remote::run(c),
        cli::Cmd::Ports => cmd::ports::run(),
    }
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
