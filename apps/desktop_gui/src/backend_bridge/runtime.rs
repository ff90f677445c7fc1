//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{ConnectionEvent, CounterApi, CounterClient, CounterError, Settings};
use crossbeam_channel::{Receiver, Sender};
use tracing::{error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Settings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match CounterClient::new(&settings.server_url, settings.location_id()) {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_counter_error(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                error!(server_url = %settings.server_url, "backend worker startup failure: {err}");
                return;
            }
        };

        info!(
            server_url = %settings.server_url,
            location = %settings.location,
            "backend worker ready"
        );
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Counting station {} ready",
            settings.location
        )));
        runtime.block_on(serve_commands(&client, cmd_rx, ui_tx));
    })
}

/// Serves commands until the UI drops its sender.
pub async fn serve_commands(
    api: &dyn CounterApi,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let mut tracker = ConnectionTracker::default();
    while let Ok(cmd) = cmd_rx.recv() {
        let event = handle_command(api, cmd).await;
        let reachable = !matches!(&event, UiEvent::Error(err) if err.is_connection_loss());
        if let Some(connection) = tracker.observe(reachable) {
            if ui_tx.send(UiEvent::Connection(connection)).is_err() {
                break;
            }
        }
        if ui_tx.send(event).is_err() {
            break;
        }
    }
    info!("backend command channel closed; worker exiting");
}

pub async fn handle_command(api: &dyn CounterApi, cmd: BackendCommand) -> UiEvent {
    let name = cmd.name();
    let result = match cmd {
        BackendCommand::SaveCount {
            correct_count,
            defect_count,
            custom_fields,
        } => api
            .save_count(correct_count, defect_count, &custom_fields)
            .await
            .map(UiEvent::CountsSaved)
            .map_err(|err| (UiErrorContext::SaveCount, err)),
        BackendCommand::ResetCount => api
            .reset_count()
            .await
            .map(UiEvent::CountsReset)
            .map_err(|err| (UiErrorContext::ResetCount, err)),
        BackendCommand::ResetCountCurrent {
            correct_count,
            defect_count,
            item_no,
        } => api
            .reset_count_current(correct_count, defect_count, &item_no)
            .await
            .map(UiEvent::CurrentCountReset)
            .map_err(|err| (UiErrorContext::ResetCount, err)),
        BackendCommand::Start => run_control(api.start().await),
        BackendCommand::Pause => run_control(api.pause().await),
        BackendCommand::Stop => run_control(api.stop().await),
    };

    match result {
        Ok(event) => event,
        Err((context, err)) => {
            warn!(command = name, "backend command failed: {err}");
            UiEvent::Error(UiError::from_counter_error(context, &err))
        }
    }
}

fn run_control(
    result: Result<shared::protocol::RunStatus, CounterError>,
) -> Result<UiEvent, (UiErrorContext, CounterError)> {
    result
        .map(UiEvent::RunStatusChanged)
        .map_err(|err| (UiErrorContext::RunControl, err))
}

/// Turns per-request reachability into connect/lost/reconnected transitions.
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    connected: Option<bool>,
    failed_attempts: u32,
}

impl ConnectionTracker {
    pub fn observe(&mut self, reachable: bool) -> Option<ConnectionEvent> {
        match (self.connected, reachable) {
            (None, true) => {
                self.connected = Some(true);
                Some(ConnectionEvent::Connected)
            }
            (Some(true), true) => None,
            (Some(false), true) => {
                self.connected = Some(true);
                let attempt = std::mem::take(&mut self.failed_attempts);
                Some(ConnectionEvent::Reconnected { attempt })
            }
            (Some(false), false) => {
                self.failed_attempts += 1;
                None
            }
            (_, false) => {
                self.connected = Some(false);
                self.failed_attempts = 1;
                Some(ConnectionEvent::Error(
                    "counting server unreachable".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Mutex};

    use async_trait::async_trait;
    use crossbeam_channel::bounded;
    use shared::{
        error::{ApiError, ErrorCode},
        protocol::{CountSnapshot, CurrentCountSnapshot, RunStatus},
    };

    use super::*;

    #[derive(Default)]
    struct FakeCounterApi {
        saved: Mutex<Vec<(i64, i64, BTreeMap<String, String>)>>,
        reject_reset: bool,
    }

    #[async_trait]
    impl CounterApi for FakeCounterApi {
        async fn save_count(
            &self,
            correct_count: i64,
            defect_count: i64,
            custom_fields: &BTreeMap<String, String>,
        ) -> Result<CountSnapshot, CounterError> {
            self.saved
                .lock()
                .expect("saved lock")
                .push((correct_count, defect_count, custom_fields.clone()));
            Ok(CountSnapshot {
                total_count: 40 + correct_count + defect_count,
                defect_count,
                correct_count,
            })
        }

        async fn reset_count(&self) -> Result<CountSnapshot, CounterError> {
            if self.reject_reset {
                return Err(CounterError::Server(
                    ApiError::new(ErrorCode::Validation, "Detection config not found").into(),
                ));
            }
            Ok(CountSnapshot::default())
        }

        async fn reset_count_current(
            &self,
            _correct_count: i64,
            _defect_count: i64,
            _item_no: &str,
        ) -> Result<CurrentCountSnapshot, CounterError> {
            Ok(CurrentCountSnapshot::default())
        }

        async fn start(&self) -> Result<RunStatus, CounterError> {
            Ok(RunStatus::Started)
        }

        async fn pause(&self) -> Result<RunStatus, CounterError> {
            Ok(RunStatus::Paused)
        }

        async fn stop(&self) -> Result<RunStatus, CounterError> {
            Ok(RunStatus::Stopped)
        }
    }

    #[tokio::test]
    async fn save_command_forwards_counts_and_custom_fields() {
        let api = FakeCounterApi::default();
        let custom_fields = BTreeMap::from([("item_no".to_string(), "A-1".to_string())]);

        let event = handle_command(
            &api,
            BackendCommand::SaveCount {
                correct_count: 5,
                defect_count: 2,
                custom_fields: custom_fields.clone(),
            },
        )
        .await;

        assert!(matches!(
            event,
            UiEvent::CountsSaved(CountSnapshot {
                total_count: 47,
                ..
            })
        ));
        assert_eq!(
            api.saved.lock().expect("saved lock").as_slice(),
            &[(5, 2, custom_fields)]
        );
    }

    #[tokio::test]
    async fn server_rejection_becomes_ui_error() {
        let api = FakeCounterApi {
            reject_reset: true,
            ..FakeCounterApi::default()
        };
        match handle_command(&api, BackendCommand::ResetCount).await {
            UiEvent::Error(err) => {
                assert_eq!(err.context(), UiErrorContext::ResetCount);
                assert!(!err.is_connection_loss());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn serve_commands_announces_connection_then_results() {
        let api = FakeCounterApi::default();
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(8);
        cmd_tx.send(BackendCommand::Start).expect("queue start");
        cmd_tx.send(BackendCommand::Pause).expect("queue pause");
        drop(cmd_tx);

        serve_commands(&api, cmd_rx, ui_tx).await;

        let events: Vec<UiEvent> = ui_rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            UiEvent::Connection(ConnectionEvent::Connected)
        ));
        assert!(matches!(
            events[1],
            UiEvent::RunStatusChanged(RunStatus::Started)
        ));
        assert!(matches!(
            events[2],
            UiEvent::RunStatusChanged(RunStatus::Paused)
        ));
    }

    #[test]
    fn tracker_reports_loss_once_and_counts_failed_attempts() {
        let mut tracker = ConnectionTracker::default();
        assert_eq!(tracker.observe(true), Some(ConnectionEvent::Connected));
        assert_eq!(tracker.observe(true), None);
        assert!(matches!(
            tracker.observe(false),
            Some(ConnectionEvent::Error(_))
        ));
        assert_eq!(tracker.observe(false), None);
        assert_eq!(tracker.observe(false), None);
        assert_eq!(
            tracker.observe(true),
            Some(ConnectionEvent::Reconnected { attempt: 3 })
        );
        assert_eq!(tracker.observe(true), None);
    }
}
