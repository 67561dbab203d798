//! Local `chromedriver` provisioning.
//!
//! When no remote WebDriver URL is configured, a `chromedriver` child process
//! is started on a local port before the first session is opened. The child
//! is killed when [`ChromeDriverService::stop`] is called or the service is
//! dropped.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::error::ScrapeError;

const PORT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running `chromedriver` process.
#[derive(Debug)]
pub struct ChromeDriverService {
    child: Child,
    port: u16,
}

impl ChromeDriverService {
    /// Spawn `binary --port=<port>` and wait until the port accepts connections.
    ///
    /// # Arguments
    ///
    /// * `binary` - Path or name of the `chromedriver` executable
    /// * `port` - Local port the driver listens on
    /// * `startup_timeout` - How long to wait for the port to open
    ///
    /// # Returns
    ///
    /// The running service; the process is killed on [`Self::stop`] or drop.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::DriverStartup`] if the binary cannot be spawned, exits
    /// early, or the port stays closed for longer than `startup_timeout`.
    #[instrument(level = "info", skip(startup_timeout))]
    pub async fn start(
        binary: &str,
        port: u16,
        startup_timeout: Duration,
    ) -> Result<Self, ScrapeError> {
        let child = Command::new(binary)
            .arg(format!("--port={port}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScrapeError::DriverStartup(format!("cannot spawn {binary}: {e}")))?;

        let mut service = Self { child, port };
        service.wait_until_ready(startup_timeout).await?;
        info!(port, "chromedriver is accepting connections");
        Ok(service)
    }

    async fn wait_until_ready(&mut self, startup_timeout: Duration) -> Result<(), ScrapeError> {
        let t0 = Instant::now();
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Err(ScrapeError::DriverStartup(format!(
                    "chromedriver exited early with {status}"
                )));
            }
            if TcpStream::connect(("127.0.0.1", self.port)).await.is_ok() {
                debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Port is open");
                return Ok(());
            }
            if t0.elapsed() >= startup_timeout {
                return Err(ScrapeError::DriverStartup(format!(
                    "port {} not open after {:?}",
                    self.port, startup_timeout
                )));
            }
            sleep(PORT_POLL_INTERVAL).await;
        }
    }

    /// URL that WebDriver clients should connect to.
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Kill the child process and wait for it to exit.
    #[instrument(level = "info", skip_all, fields(port = self.port))]
    pub async fn stop(mut self) {
        if let Err(e) = self.child.kill().await {
            warn!(error = %e, "Failed to stop chromedriver");
        } else {
            info!("chromedriver stopped");
        }
    }
}
