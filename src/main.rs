use clap::Parser as _;
use mthermal_modbus_tools::commands;
use tracing_subscriber::filter::{LevelFilter, targets::Targets};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

const LOG_VARIABLE: &str = "MTHERMAL_MODBUS_LOG";

#[derive(clap::Parser)]
#[clap(version, about, author)]
enum Commands {
    Registers(commands::registers::Args),
    Scan(commands::scan::Args),
    Read(commands::read::Args),
    Write(commands::write::Args),
    SetTarget(commands::set_target::Args),
}

fn end<E: std::error::Error>(r: Result<(), E>) {
    std::process::exit(match r {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            let mut cause = e.source();
            while let Some(e) = cause {
                eprintln!("  because: {e}");
                cause = e.source();
            }
            1
        }
    });
}

fn log_filter() -> Targets {
    let default = Targets::new().with_default(LevelFilter::WARN);
    let Ok(filter_description) = std::env::var(LOG_VARIABLE) else {
        return default;
    };
    filter_description.parse::<Targets>().unwrap_or_else(|e| {
        eprintln!("warning: ignoring {LOG_VARIABLE}={filter_description:?}: {e}");
        default
    })
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(log_filter())
        .init();
    match Commands::parse() {
        Commands::Registers(args) => end(commands::registers::run(args)),
        Commands::Scan(args) => end(commands::scan::run(args)),
        Commands::Read(args) => end(commands::read::run(args)),
        Commands::Write(args) => end(commands::write::run(args)),
        Commands::SetTarget(args) => end(commands::set_target::run(args)),
    }
}
