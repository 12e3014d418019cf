use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::state::StateStore;
use crate::bot::{handlers, keyboards, text};
use crate::config::BotConfig;
use crate::shared::AppResult;
use crate::storage::ExpenseStore;

/// Slash commands. Matching is verbatim and case-sensitive.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case", description = "Supported commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "today's expenses")]
    Today,
    #[command(description = "report for a month, e.g. /monthly 2024-01")]
    Monthly { month: String },
    #[command(description = "delete the last expense")]
    DeleteLast,
    #[command(description = "list all expenses")]
    AllExpenses,
}

static MONTH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}$").expect("month pattern is valid")
});

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    store: Arc<dyn ExpenseStore>,
    states: StateStore,
    config: Arc<BotConfig>,
) -> ResponseResult<()> {
    let chat = msg.chat.id;

    let result = match cmd {
        Command::Start => start(&bot, &states, chat).await,
        Command::Help => handlers::show_help(&bot, chat).await,
        Command::Today => {
            handlers::show_period_report(
                &bot,
                store.as_ref(),
                &config,
                chat,
                text::today(),
                None,
                "📅 Today",
                0,
            )
            .await
        }
        Command::Monthly { month } => {
            monthly(&bot, store.as_ref(), &config, chat, &month).await
        }
        Command::DeleteLast => handlers::delete_last(&bot, store.as_ref(), chat).await,
        Command::AllExpenses => {
            handlers::show_all_expenses(&bot, store.as_ref(), &config, chat, 0).await
        }
    };

    handlers::finish(&bot, chat, result).await
}

/// `/start`: drop any in-progress entry flow and show the walkthrough.
async fn start(bot: &Bot, states: &StateStore, chat: ChatId) -> AppResult<()> {
    states.clear(chat).await;
    bot.send_message(chat, text::WELCOME)
        .reply_markup(keyboards::main_menu())
        .await?;
    Ok(())
}

/// `/monthly YYYY-MM`: report over one calendar month.
async fn monthly(
    bot: &Bot,
    store: &dyn ExpenseStore,
    config: &BotConfig,
    chat: ChatId,
    month: &str,
) -> AppResult<()> {
    let start = if MONTH_PATTERN.is_match(month) {
        format!("{month}-01").parse::<NaiveDate>().ok()
    } else {
        None
    };

    let Some(start) = start else {
        bot.send_message(chat, "❌ Invalid format. Use: /monthly 2024-01")
            .reply_markup(keyboards::main_menu())
            .await?;
        return Ok(());
    };

    let end = last_day_of_month(start);
    handlers::show_period_report(
        bot,
        store,
        config,
        chat,
        start,
        Some(end),
        &format!("📅 {month}"),
        0,
    )
    .await
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month
        .map(|d| d - Duration::days(1))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_pattern_is_exact() {
        assert!(MONTH_PATTERN.is_match("2024-01"));
        assert!(MONTH_PATTERN.is_match("1999-12"));
        assert!(!MONTH_PATTERN.is_match("2024-1"));
        assert!(!MONTH_PATTERN.is_match("2024-011"));
        assert!(!MONTH_PATTERN.is_match(" 2024-01"));
        assert!(!MONTH_PATTERN.is_match("2024-01 "));
        assert!(!MONTH_PATTERN.is_match("24-01"));
        assert!(!MONTH_PATTERN.is_match("report 2024-01"));
    }

    #[test]
    fn test_last_day_of_month() {
        let cases = [
            ("2024-01-01", "2024-01-31"),
            ("2024-02-01", "2024-02-29"),
            ("2023-02-01", "2023-02-28"),
            ("2024-04-01", "2024-04-30"),
            ("2024-12-01", "2024-12-31"),
        ];
        for (first, last) in cases {
            let first: NaiveDate = first.parse().unwrap();
            let last: NaiveDate = last.parse().unwrap();
            assert_eq!(last_day_of_month(first), last);
        }
    }
}
