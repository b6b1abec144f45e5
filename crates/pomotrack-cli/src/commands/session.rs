//! Interactive session: stdin commands and one-second pulses on one loop.

use std::sync::Arc;

use pomotrack_core::{AppState, Config, Event, PulseDriver};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::shell::Shell;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(config))
}

async fn session_loop(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let app = AppState::new(config.timer.clone()).into_shared();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<Event>();
    let mut pulse = PulseDriver::new(Arc::clone(&app), events_tx);
    let mut shell = Shell::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    {
        let state = app.lock().map_err(|_| "application state lock poisoned")?;
        println!("{}", shell.banner(&state));
    }
    tracing::info!("session started");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                let outcome = {
                    let mut state = app.lock().map_err(|_| "application state lock poisoned")?;
                    let outcome = shell.execute(&mut state, &line);
                    pulse.sync(state.is_running());
                    outcome
                };
                for text in &outcome.lines {
                    println!("{text}");
                }
                if outcome.quit {
                    break;
                }
            }
            Some(event) = events_rx.recv() => {
                let status = {
                    let state = app.lock().map_err(|_| "application state lock poisoned")?;
                    shell.status_line(&state)
                };
                println!("{}", serde_json::to_string_pretty(&event)?);
                println!("{status}");
            }
        }
    }

    pulse.stop();
    let stats = app
        .lock()
        .map_err(|_| "application state lock poisoned")?
        .stats();
    tracing::info!(
        completed_work_intervals = stats.completed_work_intervals,
        "session ended"
    );
    Ok(())
}
