use chrono::NaiveDate;

use crate::bot::amount::parse_amount;
use crate::bot::state::{EntryState, EntryStep};
use crate::config::{Category, Limits};
use crate::models::NewExpense;

/// What the controller should do after feeding one input to the entry flow.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Input did not match a category; show the category keyboard again.
    RepromptCategory,
    /// Category accepted; ask for a description.
    AskDescription(Category),
    /// Description rejected; re-prompt with the given message.
    RepromptDescription(String),
    /// Description accepted; ask for the amount.
    AskAmount,
    /// Amount rejected; re-prompt with the given message.
    RepromptAmount(String),
    /// Flow finished; save this expense and clear the state.
    Complete(NewExpense),
}

/// Advances the entry flow by one input.
///
/// Mutates `state` only when the step accepts the input; rejected input
/// leaves the state untouched so the user is re-prompted at the same step.
pub fn advance(state: &mut EntryState, text: &str, limits: &Limits, today: NaiveDate) -> EntryOutcome {
    match state.step {
        EntryStep::Category => match Category::from_label(text) {
            Some(category) => {
                state.category = Some(category);
                state.step = EntryStep::Description;
                EntryOutcome::AskDescription(category)
            }
            None => EntryOutcome::RepromptCategory,
        },

        EntryStep::Description => {
            // A category button tapped at the wrong step is not a description.
            if Category::from_label(text).is_some() {
                return EntryOutcome::RepromptDescription(
                    "❌ That is a category button. Please write a short description:".to_string(),
                );
            }
            if text.chars().count() > limits.max_description_len {
                return EntryOutcome::RepromptDescription(format!(
                    "❌ The description is too long. It can be at most {} characters.\nPlease write a shorter one:",
                    limits.max_description_len
                ));
            }
            state.description = Some(text.to_string());
            state.step = EntryStep::Amount;
            EntryOutcome::AskAmount
        }

        EntryStep::Amount => match parse_amount(text, limits.max_amount) {
            Err(e) => EntryOutcome::RepromptAmount(format!(
                "❌ {}\nPlease enter it again:",
                e.user_message()
            )),
            Ok(amount) => {
                let Some(category) = state.category else {
                    // Unreachable through the normal flow; restart cleanly.
                    *state = EntryState::new();
                    return EntryOutcome::RepromptCategory;
                };
                let description = state.description.clone().unwrap_or_default();
                EntryOutcome::Complete(NewExpense {
                    category: category.label().to_string(),
                    description,
                    amount,
                    date: today,
                })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        "2024-06-15".parse().unwrap()
    }

    #[test]
    fn test_happy_path() {
        let limits = Limits::default();
        let mut state = EntryState::new();

        let outcome = advance(&mut state, "🍔 Food", &limits, today());
        assert_eq!(outcome, EntryOutcome::AskDescription(Category::Food));
        assert_eq!(state.step, EntryStep::Description);

        let outcome = advance(&mut state, "burger", &limits, today());
        assert_eq!(outcome, EntryOutcome::AskAmount);
        assert_eq!(state.step, EntryStep::Amount);

        let outcome = advance(&mut state, "25 000", &limits, today());
        assert_eq!(
            outcome,
            EntryOutcome::Complete(NewExpense {
                category: "🍔 Food".to_string(),
                description: "burger".to_string(),
                amount: 25000.0,
                date: today(),
            })
        );
    }

    #[test]
    fn test_unknown_category_reprompts_without_advancing() {
        let limits = Limits::default();
        let mut state = EntryState::new();

        let outcome = advance(&mut state, "Groceries", &limits, today());
        assert_eq!(outcome, EntryOutcome::RepromptCategory);
        assert_eq!(state.step, EntryStep::Category);
        assert!(state.category.is_none());
    }

    #[test]
    fn test_category_label_rejected_at_description_step() {
        let limits = Limits::default();
        let mut state = EntryState::new();
        advance(&mut state, "🍔 Food", &limits, today());

        let outcome = advance(&mut state, "🚕 Transport", &limits, today());
        assert!(matches!(outcome, EntryOutcome::RepromptDescription(_)));
        assert_eq!(state.step, EntryStep::Description);
        assert_eq!(state.category, Some(Category::Food));
        assert!(state.description.is_none());
    }

    #[test]
    fn test_oversized_description_reprompts() {
        let limits = Limits::default();
        let mut state = EntryState::new();
        advance(&mut state, "🍔 Food", &limits, today());

        let long = "x".repeat(limits.max_description_len + 1);
        let outcome = advance(&mut state, &long, &limits, today());
        assert!(matches!(outcome, EntryOutcome::RepromptDescription(_)));
        assert_eq!(state.step, EntryStep::Description);

        let exact = "x".repeat(limits.max_description_len);
        let outcome = advance(&mut state, &exact, &limits, today());
        assert_eq!(outcome, EntryOutcome::AskAmount);
    }

    #[test]
    fn test_invalid_amount_reprompts_without_losing_state() {
        let limits = Limits::default();
        let mut state = EntryState::new();
        advance(&mut state, "🍔 Food", &limits, today());
        advance(&mut state, "burger", &limits, today());

        let outcome = advance(&mut state, "abc", &limits, today());
        assert!(matches!(outcome, EntryOutcome::RepromptAmount(_)));
        assert_eq!(state.step, EntryStep::Amount);
        assert_eq!(state.description.as_deref(), Some("burger"));

        let outcome = advance(&mut state, "100", &limits, today());
        assert!(matches!(outcome, EntryOutcome::Complete(_)));
    }
}
