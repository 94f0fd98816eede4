//! Application configuration.

use clap::Parser;

use crate::eth::executor::ExecutorConfig;

/// Loads the `.env` file when present.
///
/// Executed manually before clap parsing because clap reads the environment.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Configuration of the bridge binary.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct BridgeConfig {
    #[clap(flatten)]
    pub executor: ExecutorConfig,
}
