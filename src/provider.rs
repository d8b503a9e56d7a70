use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::player_fetch;
use crate::search_fetch;
use crate::state::{Delta, PlayerView, ProviderCommand};

/// Background worker doing the blocking HTTP. Commands arrive with the
/// token they were issued under and every response delta carries it back,
/// so the UI thread can drop whatever has been superseded. The worker
/// never touches state; it only fetches and reports.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::SearchPlayers { query, token } => {
                    match search_fetch::fetch_search_results(&query) {
                        Ok(items) => {
                            let _ = tx.send(Delta::SetSuggestions { token, items });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::SearchFailed {
                                token,
                                message: err.to_string(),
                            });
                        }
                    }
                }
                ProviderCommand::FetchPlayer {
                    path,
                    name,
                    team,
                    token,
                } => match player_fetch::fetch_player_detail(&path) {
                    Ok(detail) => {
                        let _ = tx.send(Delta::SetPlayer {
                            token,
                            player: PlayerView { name, team, detail },
                        });
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::PlayerFailed {
                            token,
                            message: err.to_string(),
                        });
                    }
                },
            }
        }
    });
}
