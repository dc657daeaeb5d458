use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use common::actors::{AbortOnDrop, Actor, ActorType, ControlMessage};
use strategy::SignalCollector;
use teloxide::{prelude::*, utils::command::BotCommands};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::services::telegram_service::{TelegramService, deliver};

pub const NO_DEALS_TEXT: &str = "Братиш, пока выгодных сделок нет.";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "проверить сигналы прямо сейчас.")]
    Check,
    #[command(description = "показать этот список.")]
    Help,
}

/// What `/check` answers with: the signals, or the fallback line when
/// there are none.
pub fn check_replies(signals: Vec<String>) -> Vec<String> {
    if signals.is_empty() {
        vec![NO_DEALS_TEXT.to_string()]
    } else {
        signals
    }
}

/// Long-polls Telegram and answers bot commands.
pub struct CommandService {
    id: Uuid,
    bot: Bot,
    collector: Arc<SignalCollector>,
}

#[async_trait]
impl Actor for CommandService {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> ActorType {
        ActorType::CommandActor
    }

    async fn run(&mut self, supervisor_tx: mpsc::Sender<ControlMessage>) -> anyhow::Result<()> {
        let heartbeat = AbortOnDrop(self.spawn_heartbeat(supervisor_tx.clone()));

        info!("Starting Command Service");

        let handler = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(answer);

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.collector.clone()])
            .build()
            .dispatch()
            .await;

        drop(heartbeat);
        supervisor_tx
            .send(ControlMessage::Error(
                self.id,
                format!("{:?}: command dispatcher stopped.", self.name()),
            ))
            .await?;
        bail!("Command dispatcher stopped")
    }
}

impl CommandService {
    pub fn new(bot: Bot, collector: Arc<SignalCollector>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bot,
            collector,
        }
    }
}

async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    collector: Arc<SignalCollector>,
) -> ResponseResult<()> {
    match cmd {
        Command::Check => {
            info!("/check requested in chat {}", msg.chat.id);
            let replies = check_replies(collector.check_signals().await);
            deliver(&TelegramService::replying_to(bot, &msg), replies).await;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }
    Ok(())
}
