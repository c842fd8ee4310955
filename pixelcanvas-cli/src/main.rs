//! PixelCanvas CLI - Command-line interface
//!
//! Runs the pixel service and talks to a running one.

mod commands;
mod error;
mod runner;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use commands::common::StoreType;
use commands::config::ConfigCommands;
use commands::pixel::{PixelAction, PixelArgs};
use commands::serve::ServeArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "pixelcanvas")]
#[command(version, about = "Shared pixel canvas service and client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pixel service
    Serve {
        /// Address to listen on (default from config: 127.0.0.1:8787)
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Store backend
        #[arg(long, value_enum)]
        store: Option<StoreType>,

        /// Directory of the disk store
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Seconds allowed per store operation
        #[arg(long)]
        store_timeout: Option<u64>,
    },

    /// Read a pixel
    #[command(allow_negative_numbers = true)]
    Get(CoordArgs),

    /// Paint a pixel
    #[command(allow_negative_numbers = true)]
    Set(PaintArgs),

    /// Paint a pixel (same as set)
    #[command(allow_negative_numbers = true)]
    Update(PaintArgs),

    /// Erase a pixel
    #[command(allow_negative_numbers = true)]
    Delete(CoordArgs),

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args)]
struct CoordArgs {
    /// X coordinate
    x: i64,

    /// Y coordinate
    y: i64,

    /// Service endpoint (default from config)
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args)]
struct PaintArgs {
    #[command(flatten)]
    coord: CoordArgs,

    /// Color to paint, e.g. '#ff0000'
    color: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve {
            listen,
            store,
            data_dir,
            store_timeout,
        } => commands::serve::run(ServeArgs {
            listen,
            store,
            data_dir,
            store_timeout,
        }),
        Commands::Get(coord) => commands::pixel::run(pixel_args(coord, PixelAction::Get)),
        Commands::Set(paint) => commands::pixel::run(pixel_args(
            paint.coord,
            PixelAction::Set { color: paint.color },
        )),
        Commands::Update(paint) => commands::pixel::run(pixel_args(
            paint.coord,
            PixelAction::Update { color: paint.color },
        )),
        Commands::Delete(coord) => commands::pixel::run(pixel_args(coord, PixelAction::Delete)),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn pixel_args(coord: CoordArgs, action: PixelAction) -> PixelArgs {
    PixelArgs {
        x: coord.x,
        y: coord.y,
        action,
        url: coord.url,
    }
}
