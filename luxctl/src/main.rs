use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{info, warn};

use device_store::{ChangeKind, DeviceStore};
use luxtronik_sdk::{Driver, DriverConfig, HeatPump};
use luxtronik_state::logging::{init_logging, init_logging_from_env};
use luxtronik_state::{CommandGroup, CommandPayload, EntityId, SwitchCommand};

mod output;

/// Luxtronik heat pump command-line host
///
/// Reads the controller's registers, keeps an in-memory device registry in
/// step with them and forwards write commands.
#[derive(Parser, Debug)]
#[command(name = "luxctl")]
#[command(about = "Read and control a Luxtronik 2 heat pump")]
#[command(version)]
pub struct Args {
    /// Controller host name or IP address
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Controller port
    #[arg(short, long, default_value = "8889")]
    pub port: u16,

    /// Device name language: 0 English, 1 Polish, 2 Dutch
    #[arg(short, long, default_value = "0")]
    pub language: u8,

    /// Hardware name prefixed to device names
    #[arg(long, default_value = "Luxtronik")]
    pub name: String,

    /// Connect/read/write timeout in seconds
    #[arg(long)]
    pub io_timeout: Option<u64>,

    /// Debug verbosity (0 off, 1-62 info, anything else debug)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub debug: i32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read every device once and print it
    Read {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Keep polling and print every value change until Ctrl+C
    Watch {
        /// Seconds between update cycles
        #[arg(short = 'i', long, default_value = "25")]
        poll_interval: u64,
    },

    /// Send a command to a writable device
    Write {
        /// Device id (see `read`)
        device: u32,

        /// Level for setpoints and selectors
        #[arg(long, conflicts_with = "switch")]
        level: Option<f64>,

        /// Switch command for on/off devices
        #[arg(long, value_enum)]
        switch: Option<SwitchArg>,
    },

    /// Dump a raw register block
    Registers {
        #[arg(value_enum)]
        block: BlockArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SwitchArg {
    On,
    Off,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BlockArg {
    Parameters,
    Calculated,
}

impl Args {
    /// Driver configuration for the connection options
    ///
    /// `LUXTRONIK_ADDRESS` and `LUXTRONIK_PORT` override the command line.
    pub fn driver_config(&self) -> Result<DriverConfig> {
        let mut config = DriverConfig {
            address: self.address.clone(),
            port: self.port,
            language: self.language,
            debug: self.debug,
            name: self.name.clone(),
            io_timeout: self.io_timeout,
            ..DriverConfig::default()
        };

        if let Ok(address) = std::env::var("LUXTRONIK_ADDRESS") {
            config.address = address;
        }

        if let Ok(port) = std::env::var("LUXTRONIK_PORT") {
            config.port = port
                .parse()
                .context("Invalid LUXTRONIK_PORT environment variable")?;
        }

        if let Command::Watch { poll_interval } = self.command {
            config.poll_interval = poll_interval;
        }

        config.validate().context("Invalid connection options")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.driver_config()?;

    if config.debug != 0 {
        init_logging(config.logging_mode())?;
    } else {
        init_logging_from_env()?;
    }

    match args.command {
        Command::Read { json } => read(&config, json),
        Command::Watch { .. } => watch(&config),
        Command::Write { device, level, switch } => write(&config, EntityId(device), payload(level, switch)?),
        Command::Registers { block } => registers(&config, block),
    }
}

fn payload(level: Option<f64>, switch: Option<SwitchArg>) -> Result<CommandPayload> {
    match (level, switch) {
        (Some(level), None) => Ok(CommandPayload::level(level)),
        (None, Some(SwitchArg::On)) => Ok(CommandPayload::switch(SwitchCommand::On)),
        (None, Some(SwitchArg::Off)) => Ok(CommandPayload::switch(SwitchCommand::Off)),
        _ => bail!("Exactly one of --level or --switch is required"),
    }
}

fn read(config: &DriverConfig, json: bool) -> Result<()> {
    let store = DeviceStore::new();
    let mut heat_pump = HeatPump::from_config(config, store.clone())?;
    heat_pump.register_devices();

    let report = heat_pump.update_all();
    for (group, e) in report.failures() {
        warn!("{} failed: {}", group, e);
    }
    if report.updated() == 0 {
        bail!("No values could be read from {}:{}", config.address, config.port);
    }

    let devices = store.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
    } else {
        print!("{}", output::device_table(&devices));
    }
    Ok(())
}

fn watch(config: &DriverConfig) -> Result<()> {
    let store = DeviceStore::new();
    store.watch_all();
    let events = store.iter();

    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Failed to install Ctrl+C handler")?;

    let driver = Driver::start(config, store.clone()).context("Failed to start driver")?;
    info!("Watching {}:{}, press Ctrl+C to stop", config.address, config.port);

    while stop_rx.try_recv().is_err() {
        let Some(event) = events.recv_timeout(Duration::from_millis(200)) else {
            continue;
        };
        if event.kind != ChangeKind::ValueChanged {
            continue;
        }
        if let Some(device) = store.get(event.device_id) {
            println!("{}", output::change_line(&device));
        }
    }

    driver.shutdown();
    Ok(())
}

fn write(config: &DriverConfig, id: EntityId, payload: CommandPayload) -> Result<()> {
    let store = DeviceStore::new();
    let mut heat_pump = HeatPump::from_config(config, store.clone())?;
    heat_pump.register_devices();

    let raw = heat_pump
        .handle_command(id, &payload)
        .with_context(|| format!("Command on device {} failed", id))?;

    let name = heat_pump.device_name(id).unwrap_or_else(|| id.to_string());
    println!("{}: wrote {}", name, raw);
    if let Some(device) = store.get(id) {
        println!("{}", output::change_line(&device));
    }
    Ok(())
}

fn registers(config: &DriverConfig, block: BlockArg) -> Result<()> {
    let client = config.client();
    let (group, registers) = match block {
        BlockArg::Parameters => (CommandGroup::ReadParameters, client.read_parameters()?.registers),
        BlockArg::Calculated => (CommandGroup::ReadCalculated, client.read_calculated()?.registers),
    };

    println!("{} ({} registers)", group, registers.len());
    print!("{}", output::register_dump(&registers));
    Ok(())
}
