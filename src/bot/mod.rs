use std::sync::Arc;

use log::info;
use teloxide::dptree;
use teloxide::prelude::*;

use crate::config::BotConfig;
use crate::storage::ExpenseStore;

pub mod amount;
pub mod callback;
pub mod commands;
pub mod entry;
pub mod handlers;
pub mod keyboards;
pub mod state;
pub mod text;

pub use commands::Command;
pub use state::StateStore;

/// Runs the bot until the process is stopped.
///
/// One dispatcher, three branches: known slash commands, free text (entry
/// flow + menu labels), inline-button callbacks. The storage backend, the
/// conversation state store and the config are process-wide singletons
/// injected into every handler.
pub async fn run_bot(config: BotConfig, store: Arc<dyn ExpenseStore>) {
    let bot = Bot::new(config.bot_token.clone());
    let states = StateStore::new();
    let config = Arc::new(config);

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(commands::handle_command),
        )
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

    info!("starting dispatcher");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![store, states, config])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
