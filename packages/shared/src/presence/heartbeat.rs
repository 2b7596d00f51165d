use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::services::player_service::PlayerService;

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);

/// Keeps a player's heartbeat fresh until stopped or dropped.
pub struct HeartbeatHandle {
    user_id: String,
    service: Arc<PlayerService>,
    task: JoinHandle<()>,
}

/// Writes a heartbeat now and then every `interval`. Failed writes are logged
/// and the loop keeps going.
pub fn spawn_heartbeat(
    service: Arc<PlayerService>,
    user_id: &str,
    interval: Duration,
) -> HeartbeatHandle {
    let task_service = Arc::clone(&service);
    let task_user_id = user_id.to_string();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match task_service.heartbeat(&task_user_id).await {
                Ok(()) => debug!("Heartbeat sent for {}", task_user_id),
                Err(e) => warn!("Heartbeat failed for {}: {}", task_user_id, e),
            }
        }
    });

    HeartbeatHandle {
        user_id: user_id.to_string(),
        service,
        task,
    }
}

impl HeartbeatHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancels the heartbeat and marks the player offline. The offline write
    /// is best effort.
    pub async fn stop(self) {
        self.task.abort();
        if let Err(e) = self.service.go_offline(&self.user_id).await {
            warn!("Failed to mark {} offline: {}", self.user_id, e);
        }
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
