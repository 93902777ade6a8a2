//! CAN Switchboard CLI
//!
//! Assembles the switchboard bridge from configuration and command-line
//! flags and runs the sampling loop. The binary adds what the library
//! deliberately leaves out: argument parsing, logging setup, the startup
//! banner, and process exit codes.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use switchboard_core::input::InputSource;
use switchboard_core::transport::CanTransport;
use switchboard_core::{Bridge, BridgeConfig, SimulatedInput, SocketCanTransport};

mod config;

/// CAN Switchboard - Continuously transmits input switch states on the CAN bus
#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(about = "Continuously transmits input switch states on the CAN bus", long_about = None)]
#[command(version)]
struct Args {
    /// CAN interface to transmit on
    #[arg(short, long, value_name = "IFACE")]
    interface: Option<String>,

    /// Deactivate CAN frame creation and sending in the main loop for testing
    #[arg(long)]
    disable_can: bool,

    /// Cycle interval in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Stop after this many cycles (default: run forever)
    #[arg(long, value_name = "COUNT")]
    max_cycles: Option<u64>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use simulated inputs instead of GPIO hardware
    #[arg(long)]
    simulate: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    println!("Starting Switchboard");
    log::info!("Switchboard CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using bridge library v{}", switchboard_core::VERSION);

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => BridgeConfig::default(),
    };

    // Command-line flags override the config file
    if let Some(interface) = &args.interface {
        config.interface = interface.clone();
    }
    if let Some(interval_ms) = args.interval_ms {
        config.cycle_interval_ms = interval_ms;
    }
    if args.disable_can {
        config.tx_enabled = false;
    }
    config.validate().context("Invalid configuration")?;

    let source = build_input(&config, args.simulate)?;

    // With transmission disabled the transport is never constructed, so the
    // link layer is never touched
    let transport: Option<Box<dyn CanTransport>> = if config.tx_enabled {
        log::info!(
            "transmitting on {} at {} bit/s",
            config.interface,
            config.bitrate
        );
        Some(Box::new(SocketCanTransport::new(
            config.interface.clone(),
            config.bitrate,
            config.tx_queue_len,
        )))
    } else {
        log::info!("CAN transmission disabled; running in dry-run mode");
        None
    };

    let mut bridge = Bridge::new(
        source,
        transport,
        Duration::from_millis(config.cycle_interval_ms),
    );
    bridge.run(args.max_cycles).context("Bridge loop failed")?;

    let stats = bridge.stats();
    log::info!(
        "finished: {} cycles, {} frames sent, {:.2} Hz observed",
        stats.cycles,
        stats.frames_sent,
        stats.observed_hz()
    );
    Ok(())
}

#[cfg(feature = "gpio")]
fn build_input(config: &BridgeConfig, simulate: bool) -> Result<Box<dyn InputSource>> {
    if simulate {
        log::info!("using simulated switch inputs");
        return Ok(Box::new(simulated_input(config)));
    }
    let source = switchboard_core::GpioInput::new(&config.switches)
        .context("Failed to claim GPIO pins")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "gpio"))]
fn build_input(config: &BridgeConfig, simulate: bool) -> Result<Box<dyn InputSource>> {
    if !simulate {
        log::warn!("built without GPIO support; falling back to simulated inputs");
    }
    Ok(Box::new(simulated_input(config)))
}

fn simulated_input(config: &BridgeConfig) -> SimulatedInput {
    SimulatedInput::new(config.switches.iter().map(|s| s.name.clone()).collect())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
