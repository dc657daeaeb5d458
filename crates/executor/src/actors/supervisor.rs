use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};
use tracing::{error, info, warn};

use common::actors::{Actor, ActorType, ControlMessage};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant},
};
use uuid::Uuid;

type ActorFactory = Box<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

pub struct Supervisor {
    actor_factories: HashMap<ActorType, ActorFactory>,
    actor_ids: HashMap<Uuid, ActorType>,
    pulses: HashMap<ActorType, Instant>,
    handles: HashMap<ActorType, JoinHandle<()>>,
    pending_restarts: HashSet<ActorType>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            actor_factories: HashMap::new(),
            actor_ids: HashMap::new(),
            pulses: HashMap::new(),
            handles: HashMap::new(),
            pending_restarts: HashSet::new(),
        }
    }

    pub fn register_actor(&mut self, actor_type: ActorType, factory: ActorFactory) {
        self.actor_factories.insert(actor_type, factory);
    }

    pub async fn start(&mut self) {
        let mut check_interval = time::interval(Duration::from_secs(1));
        let timeout_duration = Duration::from_secs(3);

        let (supervisor_tx, mut supervisor_rx) = mpsc::channel::<ControlMessage>(512);

        let actors: Vec<ActorType> = self.actor_factories.keys().copied().collect();
        actors.into_iter().for_each(|actor| {
            self.spawn_actor(actor, supervisor_tx.clone());
        });

        loop {
            tokio::select! {
                Some(msg) = supervisor_rx.recv() => {
                    match msg {
                        ControlMessage::Heartbeat(id) => {
                            // Heartbeats from replaced instances are ignored.
                            if let Some(actor_type) = self.actor_ids.get(&id) {
                                self.pulses.insert(*actor_type, Instant::now());
                            }
                        }
                        ControlMessage::Error(id, error_msg) => {
                            if let Some(actor_type) = self.actor_ids.get(&id) {
                                error!("Actor {:?} reported error: {}", actor_type, error_msg);
                                self.pending_restarts.insert(*actor_type);
                            }
                        }
                    }
                }

                _ = check_interval.tick() => {
                    let dead_timeout = Instant::now() - timeout_duration;

                    for (key, &value) in self.pulses.iter() {
                        if value < dead_timeout {
                            warn!("{:?} is unresponsive!", key);
                            self.pending_restarts.insert(*key);
                        }
                    }

                    let restarts: Vec<ActorType> = self.pending_restarts.drain().collect();
                    restarts.into_iter().for_each(|actor_type| {
                        if let Some(handle) = self.handles.remove(&actor_type) {
                            handle.abort();
                        }
                        info!("Restarting {:?}", actor_type);
                        self.spawn_actor(actor_type, supervisor_tx.clone());
                    });
                }
            }
        }
    }

    fn spawn_actor(&mut self, actor_type: ActorType, tx: mpsc::Sender<ControlMessage>) {
        let mut new_actor = self.actor_factories[&actor_type]();
        let id = new_actor.id();

        self.actor_ids.retain(|_, t| *t != actor_type);
        self.actor_ids.insert(id, actor_type);

        let new_actor_handle = tokio::spawn(async move {
            if let Err(e) = new_actor.run(tx).await {
                error!("Actor {:?} crashed: {}", actor_type, e);
            }
        });
        self.handles.insert(actor_type, new_actor_handle);
        self.pulses.insert(actor_type, Instant::now());
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}
