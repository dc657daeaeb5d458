use std::sync::Arc;

use async_trait::async_trait;
use common::{
    actors::{AbortOnDrop, Actor, ActorType, ControlMessage},
    config::ScheduleConfig,
};
use strategy::SignalCollector;
use tokio::{
    sync::mpsc,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::info;
use uuid::Uuid;

use crate::services::telegram_service::{MessageSink, deliver};

/// Periodically collects signals and pushes them to the configured chat.
pub struct SignalJob {
    id: Uuid,
    collector: Arc<SignalCollector>,
    sink: Arc<dyn MessageSink>,
    schedule: ScheduleConfig,
}

#[async_trait]
impl Actor for SignalJob {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::SignalJobActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        let _heartbeat = AbortOnDrop(self.spawn_heartbeat(supervisor_tx.clone()));

        info!(
            "Starting Signal Job: first run in {:?}, then every {:?}",
            self.schedule.first_delay, self.schedule.interval
        );

        let mut ticker = time::interval_at(
            Instant::now() + self.schedule.first_delay,
            self.schedule.interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}

impl SignalJob {
    pub fn new(
        collector: Arc<SignalCollector>,
        sink: Arc<dyn MessageSink>,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            collector,
            sink,
            schedule,
        }
    }

    pub async fn run_once(&self) -> usize {
        let messages = self.collector.check_signals().await;
        deliver(self.sink.as_ref(), messages).await
    }
}
