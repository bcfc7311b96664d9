//! Session commands

use std::sync::Arc;
use std::time::Duration;

use crm_client::{Access, ClientConfig, ConnectionMonitor, HttpClient, SessionGuard};
use tokio_util::sync::CancellationToken;

use super::{connect, fail};
use crate::SessionCommands;

pub async fn handle(action: SessionCommands, config: &ClientConfig) -> anyhow::Result<()> {
    let api = connect(config)?;

    match action {
        SessionCommands::Check => {
            let guard = SessionGuard::new(config);
            if !guard.has_cookie() {
                println!("No session cookie set (CRM_SESSION_COOKIE)");
            }
            match guard.require(&api).await.map_err(|e| fail("check session", e))? {
                Access::Granted => println!("Signed in to {}", api.http().base_url()),
                Access::Redirect { login_url } => {
                    println!("Not signed in. Sign in at {login_url}");
                    println!("or with Google at {}", api.google_auth_url());
                }
            }
        }
        SessionCommands::Watch { interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(config.connection_check_interval);
            let shutdown = CancellationToken::new();
            let monitor = ConnectionMonitor::spawn(Arc::new(api), interval, shutdown.clone());
            let mut status = monitor.subscribe();

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = status.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let current = *status.borrow_and_update();
                        println!("{current}");
                    }
                }
            }

            shutdown.cancel();
            monitor.join().await;
        }
        SessionCommands::Logout => {
            api.logout().await.map_err(|e| fail("sign out", e))?;
            println!("Signed out");
        }
    }
    Ok(())
}
