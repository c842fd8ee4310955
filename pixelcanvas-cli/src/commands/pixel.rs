//! Pixel commands - get, set, update and delete against a running service.

use pixelcanvas::client::{PixelClient, PixelRecord};
use pixelcanvas::coord::PixelCoord;

use super::common::resolve_client;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Operation to perform on one pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelAction {
    Get,
    Set { color: String },
    Update { color: String },
    Delete,
}

/// Arguments for a pixel command.
pub struct PixelArgs {
    pub x: i64,
    pub y: i64,
    pub action: PixelAction,
    pub url: Option<String>,
}

/// Run a pixel command.
pub fn run(args: PixelArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    let client_config = resolve_client(args.url, runner.config());
    let client = PixelClient::from_config(&client_config)?;
    let coord = PixelCoord::from((args.x, args.y));

    let runtime = runner.runtime()?;
    runtime.block_on(async {
        match &args.action {
            PixelAction::Get => {
                let record = client.fetch_pixel(args.x, args.y).await?;
                println!("{}", describe_record(&coord, record.as_ref()));
            }
            PixelAction::Set { color } | PixelAction::Update { color } => {
                let written = client.put_pixel(args.x, args.y, color).await?;
                println!("Pixel {} set to {} (stored as {})", coord, color, written.value);
            }
            PixelAction::Delete => {
                client.remove_pixel(args.x, args.y).await?;
                println!("Pixel {} deleted", coord);
            }
        }
        Ok::<(), CliError>(())
    })
}

/// Human-readable summary of a fetched pixel.
fn describe_record(coord: &PixelCoord, record: Option<&PixelRecord>) -> String {
    match record {
        Some(record) => format!(
            "Pixel {}: {} (placed from {}, {} at {})",
            coord,
            record.color,
            record.city,
            record.country,
            format_timestamp(record.timestamp)
        ),
        None => format!("Pixel {}: (not painted)", coord),
    }
}

/// Unix seconds as UTC RFC 3339, or the raw number if out of range.
fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}
