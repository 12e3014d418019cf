use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, KeyboardRemove,
};

use crate::bot::callback::CallbackAction;
use crate::config::Category;

/// Labels of the main reply keyboard. Free-text input is matched against
/// these verbatim.
pub mod labels {
    pub const ADD_EXPENSE: &str = "➕ Add expense";
    pub const DELETE_LAST: &str = "🗑 Delete last expense";
    pub const WEEKLY_REPORT: &str = "📊 Weekly report";
    pub const MONTHLY_REPORT: &str = "📈 Monthly report";
    pub const TODAY_REPORT: &str = "📅 Today's report";
    pub const SETTINGS: &str = "⚙️ Settings";
    pub const HELP: &str = "ℹ️ Help";
    pub const ALL_EXPENSES: &str = "📋 All expenses";
}

/// The main menu reply keyboard.
pub fn main_menu() -> KeyboardMarkup {
    let rows = vec![
        vec![
            KeyboardButton::new(labels::ADD_EXPENSE),
            KeyboardButton::new(labels::DELETE_LAST),
        ],
        vec![
            KeyboardButton::new(labels::WEEKLY_REPORT),
            KeyboardButton::new(labels::MONTHLY_REPORT),
        ],
        vec![
            KeyboardButton::new(labels::TODAY_REPORT),
            KeyboardButton::new(labels::SETTINGS),
        ],
        vec![
            KeyboardButton::new(labels::HELP),
            KeyboardButton::new(labels::ALL_EXPENSES),
        ],
    ];
    KeyboardMarkup::new(rows).resize_keyboard(true)
}

/// One category per row, shown during the entry flow.
pub fn categories() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = Category::ALL
        .iter()
        .map(|c| vec![KeyboardButton::new(c.label())])
        .collect();
    KeyboardMarkup::new(rows)
        .resize_keyboard(true)
        .one_time_keyboard(true)
}

/// Removes the reply keyboard while free text is expected.
pub fn remove() -> KeyboardRemove {
    KeyboardRemove::new()
}

/// Confirm/cancel row for the delete-last flow. The payload carries the
/// record id and the owning chat id.
pub fn delete_confirmation(id: i64, chat: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(
            "✅ Yes, delete",
            CallbackAction::ConfirmDelete { id, chat }.encode(),
        ),
        InlineKeyboardButton::callback(
            "❌ Cancel",
            CallbackAction::CancelDelete { chat }.encode(),
        ),
    ]])
}

/// The inline settings menu.
pub fn settings_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "🔄 Category examples",
            CallbackAction::CategoryExamples.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "📊 Today's statistics",
            CallbackAction::TodayStats.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "⬅️ Main menu",
            CallbackAction::MainMenu.encode(),
        )],
    ])
}

/// Previous/next row for a paginated view, or `None` when there is a single
/// page. `action` maps a page index to its callback payload.
pub fn pagination_row<F>(page: usize, total_pages: usize, action: F) -> Option<InlineKeyboardMarkup>
where
    F: Fn(usize) -> CallbackAction,
{
    let mut row = Vec::new();
    if page > 0 {
        row.push(InlineKeyboardButton::callback(
            "⬅️ Previous",
            action(page - 1).encode(),
        ));
    }
    if page + 1 < total_pages {
        row.push(InlineKeyboardButton::callback(
            "Next ➡️",
            action(page + 1).encode(),
        ));
    }

    if row.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(vec![row]))
    }
}
