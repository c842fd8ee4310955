//! Serve command - run the pixel service until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use pixelcanvas::app::{AppConfig, PixelCanvasApp};
use pixelcanvas::config::{ConfigFile, StoreBackend};
use pixelcanvas::service::ServiceConfig;
use pixelcanvas::store::StoreConfig;
use tokio::sync::watch;
use tracing::info;

use super::common::StoreType;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub listen: Option<SocketAddr>,
    pub store: Option<StoreType>,
    pub data_dir: Option<PathBuf>,
    pub store_timeout: Option<u64>,
}

/// Run the serve command.
pub fn run(args: ServeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("serve");
    let app_config = resolve_app_config(args, runner.config())?;

    let runtime = runner.runtime()?;
    runtime.block_on(async move {
        let app = PixelCanvasApp::start(app_config).await?;
        let addr = app.local_addr()?;

        println!("{}", pixelcanvas::version_string());
        println!("Pixel service listening on http://{}/api", addr);
        println!("Store: {}", app.config().store.backend_name());
        println!("Press Ctrl+C to stop.");

        let (stop_tx, mut stop_rx) = watch::channel(false);
        ctrlc::set_handler(move || {
            let _ = stop_tx.send(true);
        })?;

        app.run(async move {
            let _ = stop_rx.wait_for(|stop| *stop).await;
            info!("Shutdown requested");
        })
        .await?;

        println!("Pixel service stopped.");
        Ok::<(), CliError>(())
    })
}

/// Merge CLI flags over the config file: CLI > config > defaults.
fn resolve_app_config(args: ServeArgs, config: &ConfigFile) -> Result<AppConfig, CliError> {
    let backend = args
        .store
        .map(StoreBackend::from)
        .unwrap_or(config.store.backend);
    let directory = args.data_dir.unwrap_or_else(|| config.store.directory.clone());

    let store = match backend {
        StoreBackend::Memory => StoreConfig::Memory,
        StoreBackend::Disk => StoreConfig::Disk { directory },
    };

    let timeout_secs = args.store_timeout.unwrap_or(config.server.store_timeout);
    if timeout_secs == 0 {
        return Err(CliError::Config(
            "--store-timeout must be at least 1 second".to_string(),
        ));
    }
    let service = ServiceConfig::default().with_store_timeout(Duration::from_secs(timeout_secs));

    let listen = args.listen.unwrap_or(config.server.listen);
    Ok(AppConfig::new(store, listen).with_service(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_flags() -> ServeArgs {
        ServeArgs {
            listen: None,
            store: None,
            data_dir: None,
            store_timeout: None,
        }
    }

    #[test]
    fn test_defaults_come_from_config() {
        let config = ConfigFile::default();
        let app = resolve_app_config(no_flags(), &config).unwrap();
        assert_eq!(app.listen, config.server.listen);
        assert_eq!(app.store, StoreConfig::Memory);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let config = ConfigFile::default();
        let args = ServeArgs {
            listen: Some("0.0.0.0:9000".parse().unwrap()),
            store: Some(StoreType::Disk),
            data_dir: Some(PathBuf::from("/tmp/pixels")),
            store_timeout: Some(2),
        };

        let app = resolve_app_config(args, &config).unwrap();
        assert_eq!(app.listen.port(), 9000);
        assert_eq!(
            app.store,
            StoreConfig::Disk {
                directory: PathBuf::from("/tmp/pixels")
            }
        );
        assert_eq!(app.service.store_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_data_dir_alone_keeps_memory_backend() {
        let config = ConfigFile::default();
        let args = ServeArgs {
            data_dir: Some(PathBuf::from("/tmp/pixels")),
            ..no_flags()
        };
        let app = resolve_app_config(args, &config).unwrap();
        assert_eq!(app.store, StoreConfig::Memory);
    }

    #[test]
    fn test_zero_store_timeout_rejected() {
        let args = ServeArgs {
            store_timeout: Some(0),
            ..no_flags()
        };
        assert!(resolve_app_config(args, &ConfigFile::default()).is_err());
    }
}
