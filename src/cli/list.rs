use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::app::{App, ListingLocation};
use crate::client::User;
use crate::config::Config;
use crate::paging::{ControlBar, FetchCoordinator, FetchPlan, FetchUrgency, PageProjector};

/// Print one page of users
#[derive(Args)]
pub struct ListCommand {
    /// Page to print; invalid values mean page 1
    #[arg(short = 'p', long = "page")]
    pub page: Option<String>,

    /// Print JSON instead of a table
    #[arg(long = "json")]
    pub json: bool,
}

/// Machine-readable page
#[derive(Debug, Serialize)]
struct PageReport<'a> {
    page: usize,
    users: &'a [User],
    buffered: usize,
    #[serde(flatten)]
    controls: &'a ControlBar,
}

impl ListCommand {
    pub async fn execute(&self, config: Config) -> Result<()> {
        let location = ListingLocation::from_param(self.page.as_deref());
        debug!("Executing list command for {}", location);

        let app = App::new(config)?;
        let coordinator = app.coordinator();
        fill_page(coordinator, location.page).await?;

        let settings = coordinator.settings();
        let projector = PageProjector::new(settings.page_size, settings.window_size);
        let buffer = coordinator.snapshot();
        let users = projector.visible_slice(&buffer, location.page);
        let controls = projector.controls(
            location.page,
            buffer.len(),
            buffer.has_more(),
            buffer.estimated_total_pages(),
        );

        if self.json {
            let report = PageReport {
                page: location.page,
                users,
                buffered: buffer.len(),
                controls: &controls,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        if users.is_empty() {
            println!("No users on page {}", location.page);
        } else {
            print_table(users);
        }
        println!();
        println!("{}", page_summary(location.page, &controls, buffer.len()));

        Ok(())
    }
}

/// Fetch until `page` is covered; look-ahead is left to interactive mode
async fn fill_page(coordinator: &FetchCoordinator<User>, page: usize) -> Result<()> {
    while coordinator.plan(page) == FetchPlan::Fetch(FetchUrgency::Blocking) {
        let outcome = coordinator.ensure_coverage(page).await?;
        debug!("Coverage outcome: {:?}", outcome);
    }
    info!("Page {} covered", page);
    Ok(())
}

fn print_table(users: &[User]) {
    println!(
        "{:>6}  {:<7} {:<14} {:<16} {:<32} {:<16} {}",
        "ID", "GENDER", "FIRST", "LAST", "EMAIL", "PHONE", "LOCATION"
    );
    for user in users {
        println!(
            "{:>6}  {:<7} {:<14} {:<16} {:<32} {:<16} {}",
            user.id,
            user.gender,
            truncate(&user.first_name, 14),
            truncate(&user.last_name, 16),
            truncate(&user.email, 32),
            truncate(user.phone.as_deref().unwrap_or("-"), 16),
            user.location(),
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// `Page 3 of 25+ (250 users buffered)`
fn page_summary(page: usize, controls: &ControlBar, buffered: usize) -> String {
    let more = if controls.max_page_is_final { "" } else { "+" };
    format!(
        "Page {} of {}{} ({} users buffered)",
        page, controls.max_page, more, buffered
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::PageProjector;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a.very.long.address@example.com", 10), "a.very.lo…");
    }

    #[test]
    fn test_page_summary_marks_open_end() {
        let projector = PageProjector::new(10, 5);
        let open = projector.controls(3, 250, true, 1);
        assert_eq!(page_summary(3, &open, 250), "Page 3 of 25+ (250 users buffered)");

        let closed = projector.controls(5, 45, false, 5);
        assert_eq!(page_summary(5, &closed, 45), "Page 5 of 5 (45 users buffered)");
    }
}
