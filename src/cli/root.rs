use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use super::list::ListCommand;
use super::lookup::{RandomCommand, UserCommand};
use super::reload::ReloadCommand;
use crate::app::{App, ListingLocation};
use crate::config::Config;
use crate::tui;

/// userdeck - browse a paginated user directory from your terminal
#[derive(Parser)]
#[command(
    name = "userdeck",
    version,
    about = "Browse a paginated user directory from your terminal",
    long_about = r#"userdeck pages through the users of a directory service, buffering
them ahead of the current page so navigation stays instant.

Examples:
  userdeck                          # Start interactive mode
  userdeck --page 4                 # Start interactive mode on page 4
  userdeck list --page 2            # Print page 2
  userdeck reload --count 300       # Regenerate 300 users
  userdeck user 42                  # Show one user"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Directory API root (overrides config and USERDECK_BASE_URL)
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Users per page
    #[arg(long = "page-size", global = true)]
    pub page_size: Option<usize>,

    /// Page to open in interactive mode
    #[arg(short = 'p', long = "page")]
    pub page: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of users
    List(ListCommand),

    /// Regenerate the users held by the directory
    Reload(ReloadCommand),

    /// Show a single user by id
    User(UserCommand),

    /// Show a random user
    Random(RandomCommand),
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    /// Load configuration and apply command line overrides
    pub async fn load_config(&self) -> Result<Config> {
        let mut config = Config::init().await?;

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }

        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
            // Keep a batch at least one page long when only the page grows.
            config.fetch_batch_size = config.fetch_batch_size.max(page_size);
        }

        config.validate()?;
        Ok(config)
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }
        debug!("Configuration: {:?}", config);

        match self.command {
            Some(Commands::List(cmd)) => cmd.execute(config).await,
            Some(Commands::Reload(cmd)) => cmd.execute(config).await,
            Some(Commands::User(cmd)) => cmd.execute(config).await,
            Some(Commands::Random(cmd)) => cmd.execute(config).await,
            None => {
                let location = ListingLocation::from_param(self.page.as_deref());
                Self::start_interactive_mode(config, location).await
            }
        }
    }

    async fn start_interactive_mode(config: Config, location: ListingLocation) -> Result<()> {
        info!("Starting interactive mode at {}", location);

        let app = App::new(config)?;
        tui::run(app, location).await?;

        info!("Application finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interactive_with_page() {
        let cli = Cli::try_parse_from(["userdeck", "--page", "4", "--debug"]).unwrap();
        assert!(cli.is_interactive());
        assert!(cli.debug);
        assert_eq!(cli.page.as_deref(), Some("4"));
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["userdeck", "list", "--page", "2", "--json"]).unwrap();
        assert!(!cli.is_interactive());
        assert!(matches!(cli.command, Some(Commands::List(_))));

        let cli = Cli::try_parse_from(["userdeck", "reload", "--count", "300"]).unwrap();
        match cli.command {
            Some(Commands::Reload(cmd)) => assert_eq!(cmd.count, 300),
            _ => panic!("expected reload"),
        }

        let cli = Cli::try_parse_from(["userdeck", "--base-url", "http://x/api", "user", "42"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://x/api"));
        match cli.command {
            Some(Commands::User(cmd)) => assert_eq!(cmd.id, 42),
            _ => panic!("expected user"),
        }
    }

    #[test]
    fn test_reload_requires_count() {
        assert!(Cli::try_parse_from(["userdeck", "reload"]).is_err());
    }
}
