use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::app::App;
use crate::config::Config;

/// Regenerate the users held by the directory
#[derive(Args)]
pub struct ReloadCommand {
    /// Number of users to generate (1-5000)
    #[arg(short = 'n', long = "count")]
    pub count: u32,
}

impl ReloadCommand {
    pub async fn execute(&self, config: Config) -> Result<()> {
        debug!("Executing reload command with count {}", self.count);

        let app = App::new(config)?;
        let outcome = app.coordinator().reload(self.count).await?;

        let more = if outcome.has_more { " (more available)" } else { "" };
        println!(
            "Reloaded {} users; first batch holds {}{}",
            self.count, outcome.buffered, more
        );
        Ok(())
    }
}
