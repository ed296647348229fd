use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::app::App;
use crate::client::User;
use crate::config::Config;

/// Show a single user by id
#[derive(Args)]
pub struct UserCommand {
    /// User id
    pub id: i64,

    /// Print JSON instead of text
    #[arg(long = "json")]
    pub json: bool,
}

/// Show a random user
#[derive(Args)]
pub struct RandomCommand {
    /// Print JSON instead of text
    #[arg(long = "json")]
    pub json: bool,
}

impl UserCommand {
    pub async fn execute(&self, config: Config) -> Result<()> {
        debug!("Looking up user {}", self.id);
        let app = App::new(config)?;
        let user = app.coordinator().lookup(self.id).await?;
        print_user(&user, self.json)
    }
}

impl RandomCommand {
    pub async fn execute(&self, config: Config) -> Result<()> {
        debug!("Fetching a random user");
        let app = App::new(config)?;
        let user = app.coordinator().random().await?;
        print_user(&user, self.json)
    }
}

fn print_user(user: &User, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        for (label, value) in user.display_fields() {
            println!("{:<12} {}", format!("{}:", label), value);
        }
    }
    Ok(())
}
