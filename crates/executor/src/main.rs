use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::{Bot, types::ChatId};
use tracing::{debug, info};

use common::actors::{Actor, ActorType};
use common::clock::SystemClock;
use common::config::BotConfig;
use common::logger;
use market_data::{DexScreenerClient, PairSource};
use strategy::SignalCollector;

use crate::actors::supervisor::Supervisor;
use crate::services::command_service::CommandService;
use crate::services::signal_job::SignalJob;
use crate::services::telegram_service::{MessageSink, TelegramService};

mod actors;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = BotConfig::from_env()?;
    debug!("{:?}", config);

    let source: Arc<dyn PairSource> = Arc::new(DexScreenerClient::new(&config.fetch)?);
    let collector = Arc::new(SignalCollector::new(
        source,
        config.signal.clone(),
        Arc::new(SystemClock),
    ));

    let bot = Bot::new(config.telegram_token.clone());
    let notifier: Arc<dyn MessageSink> =
        Arc::new(TelegramService::new(bot.clone(), ChatId(config.chat_id)));

    let mut supervisor = Supervisor::new();

    let collector_for_job = collector.clone();
    let schedule = config.schedule.clone();
    supervisor.register_actor(
        ActorType::SignalJobActor,
        Box::new(move || {
            Box::new(SignalJob::new(
                collector_for_job.clone(),
                notifier.clone(),
                schedule.clone(),
            )) as Box<dyn Actor>
        }),
    );

    let collector_for_commands = collector.clone();
    supervisor.register_actor(
        ActorType::CommandActor,
        Box::new(move || {
            Box::new(CommandService::new(
                bot.clone(),
                collector_for_commands.clone(),
            )) as Box<dyn Actor>
        }),
    );

    info!("Bot started, pushing signals to chat {}", config.chat_id);
    supervisor.start().await;
    Ok(())
}
