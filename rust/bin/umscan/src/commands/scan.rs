//! `umscan scan`: the technician's reconciliation screen.
//!
//! The roster is fetched once over HTTP before the screen starts; the
//! count itself runs entirely in memory on a current-thread runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use inventory::model::ScannerData;
use scanner::capture::{spawn_stdin_reader, DeviceInput, KeyboardWedge, WedgeFeed};
use scanner::{AudioService, Command, Feedback, ReconciliationScreen, ScanInput, ToneSink};
use tokio::sync::mpsc;
use umscan_core::{Admission, Area, Role, SessionStatus};

use crate::commands::client::Api;
use crate::config::Contexts;

pub struct ScanOptions {
    pub unit: Option<String>,
    pub device: Option<PathBuf>,
    pub mute: bool,
}

/// Gate the screen on the signed-in role.
pub fn admit(role: Option<Role>) -> Result<()> {
    let status = match role {
        Some(role) => SessionStatus::SignedIn(role),
        None => SessionStatus::SignedOut,
    };
    match Area::Scanner.admit(&status) {
        Admission::Allow => Ok(()),
        Admission::Wait => anyhow::bail!("Session check did not finish."),
        Admission::Redirect(dest) => match role {
            Some(role) => anyhow::bail!(
                "The scanner is for technicians. {} accounts belong on {}; use `umscan get ...`.",
                role,
                dest.path()
            ),
            None => anyhow::bail!("Not signed in. Run `umscan login`."),
        },
    }
}

pub fn run(opts: ScanOptions, client_config_path: &Path) -> Result<()> {
    let contexts = Contexts::load(client_config_path)?;
    let ctx = contexts.active()?;
    let api = Api::new(ctx)?;

    let role = if ctx.token().is_none() {
        None
    } else {
        let me = api.send(api.get("/auth/me"))?;
        Some(serde_json::from_value::<Role>(me["role"].clone())?)
    };
    admit(role)?;

    let roster: Result<ScannerData> = api
        .send(api.get("/inventory/v1/scanner-data"))
        .and_then(|body| Ok(serde_json::from_value(body)?));
    match &roster {
        Ok(data) => tracing::debug!(
            units = data.mobile_units.len(),
            notebooks = data.notebooks.len(),
            "roster loaded"
        ),
        Err(e) => tracing::warn!("roster unavailable: {:#}", e),
    }

    let audio = AudioService::new(opts.mute);
    let tones = audio.sink();
    tracing::debug!(backend = audio.backend(), "tones");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async move {
        match opts.device {
            Some(path) => {
                let input = DeviceInput::new(path);
                println!("Reading codes from {}.", input.path().display());
                run_screen(input, None, roster, opts.unit, tones).await
            }
            None => {
                let wedge = KeyboardWedge::new();
                let feed = wedge.feed();
                run_screen(wedge, Some(feed), roster, opts.unit, tones).await
            }
        }
    });
    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_timeout(Duration::from_millis(100));
    Ok(())
}

async fn run_screen<I: ScanInput>(
    input: I,
    feed: Option<WedgeFeed>,
    roster: Result<ScannerData>,
    unit: Option<String>,
    tones: Arc<dyn ToneSink>,
) {
    let mut screen = ReconciliationScreen::new(input, Feedback::terminal(tones));
    let startup = startup_commands(roster.is_ok(), unit);
    screen.load(roster);

    let (tx, rx) = mpsc::unbounded_channel();
    for command in startup {
        let _ = tx.send(command);
    }
    let reader = spawn_stdin_reader(feed, tx);

    screen.run(rx).await;
    screen.close();
    reader.abort();
}

/// Commands queued before the first keystroke. A `--unit` is only selected
/// once the roster is in; otherwise the load error is all that is shown.
fn startup_commands(loaded: bool, unit: Option<String>) -> Vec<Command> {
    let mut commands = vec![Command::Help];
    if loaded {
        commands.push(match unit {
            Some(unit) => Command::SelectUnit(unit),
            None => Command::ListUnits,
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_is_for_technicians_only() {
        assert!(admit(Some(Role::User)).is_ok());

        let err = admit(Some(Role::Admin)).unwrap_err().to_string();
        assert!(err.contains("/dashboard"), "{err}");
        assert!(admit(Some(Role::Master)).is_err());

        let err = admit(None).unwrap_err().to_string();
        assert!(err.contains("umscan login"), "{err}");
    }

    #[test]
    fn startup_selects_unit_only_after_roster_loads() {
        assert_eq!(
            startup_commands(true, Some("UM 2".into())),
            vec![Command::Help, Command::SelectUnit("UM 2".into())]
        );
        assert_eq!(startup_commands(true, None), vec![Command::Help, Command::ListUnits]);
        assert_eq!(startup_commands(false, Some("UM 2".into())), vec![Command::Help]);
        assert_eq!(startup_commands(false, None), vec![Command::Help]);
    }
}
