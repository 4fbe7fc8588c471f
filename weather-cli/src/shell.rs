//! Interactive dashboard session.

use std::{fmt, sync::Arc};

use anyhow::{Context, Result};
use inquire::{InquireError, Select, Text};
use weather_core::{Session, SharedSession, Theme, TimeOfDay, WeatherProvider};

use crate::render::render_dashboard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Search,
    Refresh(String),
    Recent,
    ToggleTheme(Theme),
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Search => f.write_str("Search"),
            MenuAction::Refresh(city) => write!(f, "Refresh ({city})"),
            MenuAction::Recent => f.write_str("Recent Searches"),
            MenuAction::ToggleTheme(current) => f.write_str(current.toggle_label()),
            MenuAction::Quit => f.write_str("Quit"),
        }
    }
}

/// Actions available in the current session state.
pub fn menu_actions(session: &Session) -> Vec<MenuAction> {
    let mut actions = vec![MenuAction::Search];

    if let Some(city) = session.last_query() {
        actions.push(MenuAction::Refresh(city.to_owned()));
    }
    if !session.recent().is_empty() {
        actions.push(MenuAction::Recent);
    }

    actions.push(MenuAction::ToggleTheme(session.theme()));
    actions.push(MenuAction::Quit);
    actions
}

/// `None` when the user backed out of the prompt with Esc or Ctrl-C.
fn answered<T>(res: Result<T, InquireError>) -> Result<Option<T>> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read from the terminal"),
    }
}

async fn search(session: &SharedSession, city: &str) {
    let ticket = session.begin_search(city).await;
    let loading = session.snapshot().await;
    println!("{}", render_dashboard(&loading, TimeOfDay::now()));

    session.finish_search(ticket).await;
}

pub async fn run(provider: Arc<dyn WeatherProvider>, theme: Theme) -> Result<()> {
    let session = SharedSession::new(Session::new(theme), provider);

    loop {
        let current = session.snapshot().await;
        println!("\n{}\n", render_dashboard(&current, TimeOfDay::now()));

        let menu = Select::new("What next?", menu_actions(&current));
        let Some(action) = answered(menu.prompt())? else {
            break;
        };

        match action {
            MenuAction::Search => {
                let prompt = Text::new("City:").with_placeholder("Search your city here");
                // Input is sent as typed, including an empty string.
                if let Some(city) = answered(prompt.prompt())? {
                    search(&session, &city).await;
                }
            }
            MenuAction::Refresh(city) => search(&session, &city).await,
            MenuAction::Recent => {
                let cities: Vec<String> = current.recent().iter().map(str::to_owned).collect();
                if let Some(city) = answered(Select::new("Recent Searches:", cities).prompt())? {
                    search(&session, &city).await;
                }
            }
            MenuAction::ToggleTheme(_) => {
                let theme = session.toggle_theme().await;
                tracing::debug!(%theme, "theme switched");
            }
            MenuAction::Quit => break,
        }
    }

    Ok(())
}
