//! Async runtime based on monoio
//!
//! One single-threaded runtime drives every outbound broker call. The
//! timer driver is on by default because the HTTPS transport enforces
//! request timeouts with `monoio::time`.

use monoio::{FusionDriver, RuntimeBuilder};
use tracing::info;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Thread name, used in log lines
    pub thread_name: String,
    /// Enable the timer driver (required for request timeouts)
    pub enable_timer: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thread_name: "ndbroker-main".to_string(),
            enable_timer: true,
        }
    }
}

/// Single-threaded monoio runtime wrapper
pub struct BrokerRuntime {
    config: RuntimeConfig,
}

impl BrokerRuntime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        info!("🚀 Broker runtime configured");
        info!("   Thread: {}", config.thread_name);
        info!("   Timer: {}", config.enable_timer);

        Self { config }
    }

    /// Run a future to completion on a fresh runtime
    pub fn block_on<F>(&self, future: F) -> std::io::Result<F::Output>
    where
        F: std::future::Future,
    {
        if self.config.enable_timer {
            let mut runtime = RuntimeBuilder::<FusionDriver>::new().enable_timer().build()?;
            Ok(runtime.block_on(future))
        } else {
            let mut runtime = RuntimeBuilder::<FusionDriver>::new().build()?;
            Ok(runtime.block_on(future))
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl Default for BrokerRuntime {
    fn default() -> Self {
        Self::new()
    }
}
