use async_trait::async_trait;
use teloxide::{
    payloads::{SendMessage, SendMessageSetters},
    prelude::*,
    requests::JsonRequest,
    types::{MessageId, ReplyParameters},
};
use tracing::{debug, error};

/// Somewhere a finished signal message can be pushed to.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, text: String) -> anyhow::Result<()>;
}

pub struct TelegramService {
    bot: Bot,
    chat_id: ChatId,
    reply_to: Option<MessageId>,
}

impl TelegramService {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self {
            bot,
            chat_id,
            reply_to: None,
        }
    }

    /// Every message is sent as a reply to `message` in its chat.
    pub fn replying_to(bot: Bot, message: &Message) -> Self {
        Self {
            bot,
            chat_id: message.chat.id,
            reply_to: Some(message.id),
        }
    }

    fn message_request(&self, text: String) -> JsonRequest<SendMessage> {
        let request = self.bot.send_message(self.chat_id, text);
        match self.reply_to {
            Some(id) => request.reply_parameters(ReplyParameters::new(id)),
            None => request,
        }
    }
}

#[async_trait]
impl MessageSink for TelegramService {
    async fn send(&self, text: String) -> anyhow::Result<()> {
        self.message_request(text).await?;
        Ok(())
    }
}

/// Sends every message in order. A failed send is logged and skipped; the
/// rest still go out. Returns how many were delivered.
pub async fn deliver(sink: &dyn MessageSink, messages: Vec<String>) -> usize {
    let total = messages.len();
    let mut delivered = 0;

    for msg in messages {
        // Send message and log error if it fails, but don't stop
        match sink.send(msg).await {
            Ok(()) => delivered += 1,
            Err(e) => error!("Failed to send Telegram message: {}", e),
        }
    }

    if total > 0 {
        debug!("Delivered {}/{} messages", delivered, total);
    }
    delivered
}
