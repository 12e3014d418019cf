use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Tashkent;

use crate::models::Expense;

/// Today's calendar date in the bot's home timezone.
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&Tashkent).date_naive()
}

/// DD.MM.YYYY, the display form used in every message.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Groups thousands with spaces and shows at most two fractional digits.
///
/// Amounts are stored rounded to two digits, so formatting works on whole
/// "cents": 15000.5 -> "15 000.5", 100.0 -> "100".
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = (cents % 100).unsigned_abs();

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    if frac == 0 {
        grouped
    } else if frac % 10 == 0 {
        format!("{grouped}.{}", frac / 10)
    } else {
        format!("{grouped}.{frac:02}")
    }
}

/// One listing entry, prefixed with its global (1-based) index.
pub fn expense_line(index: usize, expense: &Expense) -> String {
    format!(
        "{index}. {}\n   {}\n   {}\n   💰 {}\n",
        format_date(expense.date),
        expense.category,
        expense.description,
        format_amount(expense.amount),
    )
}

pub const WELCOME: &str = "👋 Hi! This is the expense tracking bot.\n\n\
Use the main menu to record and review your expenses.\n\n\
ℹ️ How it works:\n\
1. Tap \"➕ Add expense\"\n\
2. Choose a category\n\
3. Write a description (e.g. burger, taxi)\n\
4. Enter the amount (e.g. 25000)\n\n\
📊 Reports:\n\
• Today's expenses\n\
• Weekly report (7 days)\n\
• Monthly report (30 days)";

pub const HELP: &str = "ℹ️ HELP\n\n\
Main functions:\n\
➕ Add expense — record a new expense\n\
📊 Weekly report — the last 7 days\n\
📈 Monthly report — the last 30 days\n\
📅 Today's report — today's expenses\n\
🗑 Delete last expense — remove the most recent entry\n\
📋 All expenses — everything you recorded\n\n\
Extra commands:\n\
/today — today's expenses\n\
/monthly [month] — report for a given month\n\
/delete_last — delete the last expense\n\
/all_expenses — list all expenses\n\n\
Example: /monthly 2024-01";

pub const UNKNOWN_COMMAND: &str = "❌ Unknown command. Send /help for help.";
