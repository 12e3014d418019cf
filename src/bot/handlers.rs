use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use log::{error, warn};
use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::bot::callback::CallbackAction;
use crate::bot::entry::{advance, EntryOutcome};
use crate::bot::keyboards::{self, labels};
use crate::bot::state::{EntryState, StateStore};
use crate::bot::text::{self, format_amount, format_date};
use crate::config::{BotConfig, Category};
use crate::report;
use crate::shared::{AppError, AppResult, ErrorSeverity};
use crate::storage::ExpenseStore;

/// Free-text endpoint: entry-flow input when a flow is in progress,
/// otherwise main-menu labels.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    store: Arc<dyn ExpenseStore>,
    states: StateStore,
    config: Arc<BotConfig>,
) -> ResponseResult<()> {
    let Some(input) = msg.text() else {
        return Ok(());
    };
    // Known slash commands were taken by the command branch already.
    if input.starts_with('/') {
        return Ok(());
    }

    let chat = msg.chat.id;
    let result = if states.get(chat).await.is_some() {
        continue_entry(&bot, store.as_ref(), &states, &config, chat, input).await
    } else {
        dispatch_menu(&bot, store.as_ref(), &states, &config, chat, input).await
    };

    finish(&bot, chat, result).await
}

/// Inline-button endpoint.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    store: Arc<dyn ExpenseStore>,
    config: Arc<BotConfig>,
) -> ResponseResult<()> {
    // Stop the client-side spinner no matter what happens next.
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(message) = q.message else {
        return Ok(());
    };
    let chat = message.chat.id;
    let message_id = message.id;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(action) = CallbackAction::parse(data) else {
        warn!("unparseable callback payload from chat {chat}: {data:?}");
        return Ok(());
    };

    // Payloads carry the chat they were issued for; a mismatch means the
    // button was forwarded or forged, and is dropped silently.
    if let Some(owner) = action.owner() {
        if owner != chat.0 {
            return Ok(());
        }
    }

    let result = match action {
        CallbackAction::ConfirmDelete { id, .. } => {
            confirm_delete(&bot, store.as_ref(), chat, message_id, id).await
        }
        CallbackAction::CancelDelete { .. } => cancel_delete(&bot, chat, message_id).await,
        CallbackAction::AllExpenses { page, .. } => {
            show_all_expenses(&bot, store.as_ref(), &config, chat, page).await
        }
        CallbackAction::Report {
            page,
            start,
            title,
            end,
            ..
        } => show_period_report(&bot, store.as_ref(), &config, chat, start, end, &title, page).await,
        CallbackAction::CategoryExamples => show_category_examples(&bot, chat).await,
        CallbackAction::TodayStats => {
            show_period_report(&bot, store.as_ref(), &config, chat, text::today(), None, "📅 Today", 0)
                .await
        }
        CallbackAction::MainMenu => show_main_menu(&bot, chat).await,
    };

    finish(&bot, chat, result).await
}

/// Boundary error handling shared by every endpoint: log, notify the user
/// generically, land back on the main menu. Nothing is retried and nothing
/// propagates out of the dispatcher.
pub(crate) async fn finish(bot: &Bot, chat: ChatId, result: AppResult<()>) -> ResponseResult<()> {
    if let Err(e) = result {
        match e.severity() {
            ErrorSeverity::Low => warn!("handler for chat {chat}: {e}"),
            _ => error!("handler for chat {chat} failed: {e}"),
        }
        if let Err(send_err) = bot
            .send_message(chat, e.user_message())
            .reply_markup(keyboards::main_menu())
            .await
        {
            error!("failed to notify chat {chat}: {send_err}");
        }
    }
    Ok(())
}

/// Main-menu label dispatch while no entry flow is active.
async fn dispatch_menu(
    bot: &Bot,
    store: &dyn ExpenseStore,
    states: &StateStore,
    config: &BotConfig,
    chat: ChatId,
    input: &str,
) -> AppResult<()> {
    match input {
        labels::ADD_EXPENSE => start_entry(bot, states, chat).await,
        labels::DELETE_LAST => delete_last(bot, store, chat).await,
        labels::WEEKLY_REPORT => {
            let start = text::today() - Duration::days(7);
            show_period_report(bot, store, config, chat, start, None, "📊 Last 7 days", 0).await
        }
        labels::MONTHLY_REPORT => {
            let start = text::today() - Duration::days(30);
            show_period_report(bot, store, config, chat, start, None, "📈 Last 30 days", 0).await
        }
        labels::TODAY_REPORT => {
            show_period_report(bot, store, config, chat, text::today(), None, "📅 Today", 0).await
        }
        labels::ALL_EXPENSES => show_all_expenses(bot, store, config, chat, 0).await,
        labels::SETTINGS => show_settings(bot, chat).await,
        labels::HELP => show_help(bot, chat).await,
        _ => {
            bot.send_message(chat, text::UNKNOWN_COMMAND)
                .reply_markup(keyboards::main_menu())
                .await?;
            Ok(())
        }
    }
}

/// Begins the three-step entry flow.
async fn start_entry(bot: &Bot, states: &StateStore, chat: ChatId) -> AppResult<()> {
    states.set(chat, EntryState::new()).await;
    bot.send_message(chat, "Choose a category:")
        .reply_markup(keyboards::categories())
        .await?;
    Ok(())
}

/// Feeds one input to the entry flow and acts on the outcome.
async fn continue_entry(
    bot: &Bot,
    store: &dyn ExpenseStore,
    states: &StateStore,
    config: &BotConfig,
    chat: ChatId,
    input: &str,
) -> AppResult<()> {
    let Some(mut state) = states.get(chat).await else {
        return dispatch_menu(bot, store, states, config, chat, input).await;
    };

    match advance(&mut state, input, &config.limits, text::today()) {
        EntryOutcome::RepromptCategory => {
            bot.send_message(chat, "❌ Please choose one of the categories:")
                .reply_markup(keyboards::categories())
                .await?;
        }
        EntryOutcome::AskDescription(category) => {
            states.set(chat, state).await;
            bot.send_message(
                chat,
                format!(
                    "Write a short description:\nExample: {}",
                    category.examples()
                ),
            )
            .reply_markup(keyboards::remove())
            .await?;
        }
        EntryOutcome::RepromptDescription(message) => {
            bot.send_message(chat, message).await?;
        }
        EntryOutcome::AskAmount => {
            states.set(chat, state).await;
            bot.send_message(chat, "Enter the amount:\nExample: 15000")
                .await?;
        }
        EntryOutcome::RepromptAmount(message) => {
            bot.send_message(chat, message).await?;
        }
        EntryOutcome::Complete(new) => {
            // Back to idle either way; a failed save means restarting the flow.
            states.clear(chat).await;
            match store.add_expense(chat.0, new).await {
                Ok(expense) => {
                    let message = format!(
                        "✅ Expense saved!\n\n\
                         🏷 Category: {}\n\
                         📝 Description: {}\n\
                         💰 Amount: {}\n\
                         📅 Date: {}",
                        expense.category,
                        expense.description,
                        format_amount(expense.amount),
                        format_date(expense.date),
                    );
                    bot.send_message(chat, message)
                        .reply_markup(keyboards::main_menu())
                        .await?;
                }
                Err(e) => {
                    error!("saving expense for chat {chat} failed: {e}");
                    bot.send_message(chat, "❌ Failed to save. Please try again.")
                        .reply_markup(keyboards::main_menu())
                        .await?;
                }
            }
        }
    }
    Ok(())
}

/// Delete-last flow, step one: show the record and ask for confirmation.
pub(crate) async fn delete_last(bot: &Bot, store: &dyn ExpenseStore, chat: ChatId) -> AppResult<()> {
    let Some(expense) = store.last_expense(chat.0).await? else {
        return Err(AppError::not_found("❌ No expense to delete"));
    };

    let message = format!(
        "🗑 Delete the last expense?\n\n\
         📅 Date: {}\n\
         🏷 Category: {}\n\
         📝 Description: {}\n\
         💰 Amount: {}\n\n\
         Really delete it?",
        format_date(expense.date),
        expense.category,
        expense.description,
        format_amount(expense.amount),
    );
    bot.send_message(chat, message)
        .reply_markup(keyboards::delete_confirmation(expense.id, chat.0))
        .await?;
    Ok(())
}

/// Delete-last flow, step two: the owner-scoped delete.
async fn confirm_delete(
    bot: &Bot,
    store: &dyn ExpenseStore,
    chat: ChatId,
    message_id: MessageId,
    id: i64,
) -> AppResult<()> {
    let deleted = store.delete_expense(id, chat.0).await?;
    if deleted > 0 {
        bot.edit_message_text(chat, message_id, "✅ Expense deleted.")
            .await?;
        bot.send_message(chat, "Choose the next action:")
            .reply_markup(keyboards::main_menu())
            .await?;
    } else {
        bot.edit_message_text(chat, message_id, "❌ Expense not found")
            .await?;
    }
    Ok(())
}

async fn cancel_delete(bot: &Bot, chat: ChatId, message_id: MessageId) -> AppResult<()> {
    // The confirmation prompt may already be gone.
    if let Err(e) = bot.delete_message(chat, message_id).await {
        warn!("could not delete confirmation prompt in chat {chat}: {e}");
    }
    bot.send_message(chat, "Deletion cancelled. Choose the next action:")
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}

/// Paginated listing of every expense the chat recorded.
pub(crate) async fn show_all_expenses(
    bot: &Bot,
    store: &dyn ExpenseStore,
    config: &BotConfig,
    chat: ChatId,
    page: usize,
) -> AppResult<()> {
    let per_page = config.limits.expenses_per_page;
    let count = store.expenses_count(chat.0).await? as usize;

    if count == 0 {
        bot.send_message(chat, "📋 All expenses\n\n❗ No expenses recorded yet.")
            .reply_markup(keyboards::main_menu())
            .await?;
        return Ok(());
    }

    let total_pages = report::total_pages(count, per_page);
    let offset = report::page_offset(page, per_page);
    let rows = store.paginated_expenses(chat.0, per_page, offset).await?;

    let mut message = format!(
        "📋 All expenses\n\n📊 Total: {count} expenses\n📄 Page: {}/{total_pages}\n\n",
        page + 1
    );
    for (i, expense) in rows.iter().enumerate() {
        message.push_str(&text::expense_line(offset + i + 1, expense));
        message.push('\n');
    }

    let request = bot.send_message(chat, message);
    match keyboards::pagination_row(page, total_pages, |p| CallbackAction::AllExpenses {
        page: p,
        chat: chat.0,
    }) {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.reply_markup(keyboards::main_menu()).await?,
    };
    Ok(())
}

/// Aggregated report over a date range, with a paginated detail section.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn show_period_report(
    bot: &Bot,
    store: &dyn ExpenseStore,
    config: &BotConfig,
    chat: ChatId,
    start: NaiveDate,
    end: Option<NaiveDate>,
    title: &str,
    page: usize,
) -> AppResult<()> {
    let rows = store.period_report(chat.0, start, end).await?;

    let Some(summary) = report::summarize(&rows, page, config.limits.report_per_page) else {
        bot.send_message(chat, format!("{title}\n\n❗ No expenses in this period."))
            .reply_markup(keyboards::main_menu())
            .await?;
        return Ok(());
    };

    let mut message = format!(
        "{title}\n\n📊 Statistics:\n💰 Total: {}\n📝 Expenses: {}\n",
        format_amount(summary.grand_total),
        summary.count
    );
    if let Some(top) = summary.totals.first() {
        message.push_str(&format!(
            "🥇 Top: {} ({})\n",
            top.category,
            format_amount(top.total)
        ));
    }
    if let Some(second) = summary.totals.get(1) {
        message.push_str(&format!(
            "🥈 Second: {} ({})\n",
            second.category,
            format_amount(second.total)
        ));
    }

    message.push_str("\n📋 By category:\n");
    for (i, entry) in summary.totals.iter().enumerate() {
        message.push_str(&format!(
            "{}. {} — {} ({}%)\n",
            i + 1,
            entry.category,
            format_amount(entry.total),
            entry.percentage
        ));
    }

    message.push_str(&format!(
        "\n📅 Recent expenses ({}/{}):\n",
        summary.page_index + 1,
        summary.total_pages
    ));
    for (i, expense) in summary.page.iter().enumerate() {
        message.push('\n');
        message.push_str(&text::expense_line(summary.page_start + i + 1, expense));
    }

    let request = bot.send_message(chat, message);
    match keyboards::pagination_row(page, summary.total_pages, |p| CallbackAction::Report {
        page: p,
        chat: chat.0,
        start,
        title: title.to_string(),
        end,
    }) {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.reply_markup(keyboards::main_menu()).await?,
    };
    Ok(())
}

pub(crate) async fn show_help(bot: &Bot, chat: ChatId) -> AppResult<()> {
    bot.send_message(chat, text::HELP)
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}

async fn show_settings(bot: &Bot, chat: ChatId) -> AppResult<()> {
    bot.send_message(chat, "⚙️ Settings:\n\nChoose one of the options:")
        .reply_markup(keyboards::settings_menu())
        .await?;
    Ok(())
}

async fn show_category_examples(bot: &Bot, chat: ChatId) -> AppResult<()> {
    let mut message = String::from("🔄 Category examples:\n\n");
    for category in Category::ALL {
        message.push_str(&format!("{}:\n{}\n\n", category.label(), category.examples()));
    }
    bot.send_message(chat, message)
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}

async fn show_main_menu(bot: &Bot, chat: ChatId) -> AppResult<()> {
    bot.send_message(chat, "Main menu:")
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}
