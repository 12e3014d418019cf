use chrono::NaiveDate;

/// Action carried by an inline button.
///
/// Typed everywhere inside the bot; the colon-separated wire form exists
/// only at the transport boundary (`encode`/`parse`). Pagination actions
/// round-trip every parameter needed to re-run the query, so pressing the
/// same button twice yields the same page.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackAction {
    /// A page of the full expense listing.
    AllExpenses { page: usize, chat: i64 },
    /// A page of a period report.
    Report {
        page: usize,
        chat: i64,
        start: NaiveDate,
        title: String,
        end: Option<NaiveDate>,
    },
    /// Confirm deleting the expense with this id.
    ConfirmDelete { id: i64, chat: i64 },
    /// Abort the delete-last flow.
    CancelDelete { chat: i64 },
    /// Settings menu: show category examples.
    CategoryExamples,
    /// Settings menu: show today's statistics.
    TodayStats,
    /// Settings menu: back to the main menu.
    MainMenu,
}

impl CallbackAction {
    /// Wire form, bounded by Telegram's 64-byte callback-data limit; report
    /// titles are kept short for that reason.
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::AllExpenses { page, chat } => format!("all:{page}:{chat}"),
            CallbackAction::Report {
                page,
                chat,
                start,
                title,
                end,
            } => {
                let title = title.replace(' ', "_");
                match end {
                    Some(end) => format!("report:{page}:{chat}:{start}:{title}:{end}"),
                    None => format!("report:{page}:{chat}:{start}:{title}"),
                }
            }
            CallbackAction::ConfirmDelete { id, chat } => format!("delete:{id}:{chat}"),
            CallbackAction::CancelDelete { chat } => format!("cancel_delete:{chat}"),
            CallbackAction::CategoryExamples => "examples".to_string(),
            CallbackAction::TodayStats => "stats_today".to_string(),
            CallbackAction::MainMenu => "main_menu".to_string(),
        }
    }

    /// Parses the wire form. Malformed payloads yield `None` and are dropped
    /// by the callback handler.
    pub fn parse(data: &str) -> Option<CallbackAction> {
        match data {
            "examples" => return Some(CallbackAction::CategoryExamples),
            "stats_today" => return Some(CallbackAction::TodayStats),
            "main_menu" => return Some(CallbackAction::MainMenu),
            _ => {}
        }

        let mut parts = data.split(':');
        let action = parts.next()?;
        match action {
            "all" => {
                let page = parts.next()?.parse().ok()?;
                let chat = parts.next()?.parse().ok()?;
                Some(CallbackAction::AllExpenses { page, chat })
            }
            "report" => {
                let page = parts.next()?.parse().ok()?;
                let chat = parts.next()?.parse().ok()?;
                let start = parts.next()?.parse().ok()?;
                let title = parts.next()?.replace('_', " ");
                let end = match parts.next() {
                    Some(raw) => Some(raw.parse().ok()?),
                    None => None,
                };
                Some(CallbackAction::Report {
                    page,
                    chat,
                    start,
                    title,
                    end,
                })
            }
            "delete" => {
                let id = parts.next()?.parse().ok()?;
                let chat = parts.next()?.parse().ok()?;
                Some(CallbackAction::ConfirmDelete { id, chat })
            }
            "cancel_delete" => {
                let chat = parts.next()?.parse().ok()?;
                Some(CallbackAction::CancelDelete { chat })
            }
            _ => None,
        }
    }

    /// Chat id embedded in the payload, when the action carries one.
    ///
    /// The handler ignores actions whose embedded chat does not match the
    /// querying chat; the fixed settings-menu actions carry none.
    pub fn owner(&self) -> Option<i64> {
        match self {
            CallbackAction::AllExpenses { chat, .. }
            | CallbackAction::Report { chat, .. }
            | CallbackAction::ConfirmDelete { chat, .. }
            | CallbackAction::CancelDelete { chat } => Some(*chat),
            CallbackAction::CategoryExamples
            | CallbackAction::TodayStats
            | CallbackAction::MainMenu => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_expenses() {
        let action = CallbackAction::AllExpenses { page: 3, chat: 42 };
        assert_eq!(action.encode(), "all:3:42");
        assert_eq!(CallbackAction::parse("all:3:42"), Some(action));
    }

    #[test]
    fn test_round_trip_report_without_end() {
        let action = CallbackAction::Report {
            page: 1,
            chat: 42,
            start: "2024-06-08".parse().unwrap(),
            title: "📊 Last 7 days".to_string(),
            end: None,
        };
        let wire = action.encode();
        assert_eq!(wire, "report:1:42:2024-06-08:📊_Last_7_days");
        assert_eq!(CallbackAction::parse(&wire), Some(action));
    }

    #[test]
    fn test_round_trip_report_with_end() {
        let action = CallbackAction::Report {
            page: 0,
            chat: 42,
            start: "2024-01-01".parse().unwrap(),
            title: "📅 2024-01".to_string(),
            end: Some("2024-01-31".parse().unwrap()),
        };
        assert_eq!(CallbackAction::parse(&action.encode()), Some(action));
    }

    #[test]
    fn test_round_trip_delete_actions() {
        let confirm = CallbackAction::ConfirmDelete { id: 17, chat: -100 };
        assert_eq!(confirm.encode(), "delete:17:-100");
        assert_eq!(CallbackAction::parse("delete:17:-100"), Some(confirm));

        let cancel = CallbackAction::CancelDelete { chat: 42 };
        assert_eq!(CallbackAction::parse(&cancel.encode()), Some(cancel));
    }

    #[test]
    fn test_fixed_menu_actions() {
        assert_eq!(
            CallbackAction::parse("examples"),
            Some(CallbackAction::CategoryExamples)
        );
        assert_eq!(
            CallbackAction::parse("stats_today"),
            Some(CallbackAction::TodayStats)
        );
        assert_eq!(
            CallbackAction::parse("main_menu"),
            Some(CallbackAction::MainMenu)
        );
    }

    #[test]
    fn test_malformed_payloads_are_rejected() {
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("unknown:1:2"), None);
        assert_eq!(CallbackAction::parse("all:x:42"), None);
        assert_eq!(CallbackAction::parse("all:1"), None);
        assert_eq!(CallbackAction::parse("report:0:42:not-a-date:title"), None);
        assert_eq!(CallbackAction::parse("delete:9"), None);
    }

    #[test]
    fn test_owner_extraction() {
        assert_eq!(
            CallbackAction::AllExpenses { page: 0, chat: 9 }.owner(),
            Some(9)
        );
        assert_eq!(CallbackAction::MainMenu.owner(), None);
    }
}
