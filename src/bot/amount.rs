use crate::shared::{AppError, AppResult};
use crate::bot::text::format_amount;

/// Parses a user-entered amount.
///
/// Normalization, in order: strip whitespace; convert a comma decimal
/// separator to a period; drop every character that is not a digit or a
/// period; when more than one period remains, the last one is the decimal
/// point and the others are removed. The result must be a number that is
/// greater than zero and at most `max_amount`, and is rounded to two
/// fractional digits.
pub fn parse_amount(text: &str, max_amount: f64) -> AppResult<f64> {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    // A leading minus sign is an explicit negative, not stray punctuation.
    if stripped.starts_with('-') {
        return Err(AppError::validation("Amount must be greater than 0"));
    }

    let mut clean = stripped.replacen(',', ".", 1);
    clean.retain(|c| c.is_ascii_digit() || c == '.');

    if clean.matches('.').count() > 1 {
        // Last period wins as the decimal point.
        if let Some(last) = clean.rfind('.') {
            let tail = clean.split_off(last);
            clean = clean.replace('.', "");
            clean.push_str(&tail);
        }
    }

    if clean.is_empty() || clean == "." {
        return Err(AppError::validation("Amount format is invalid"));
    }

    let amount: f64 = clean
        .parse()
        .map_err(|_| AppError::validation("Amount must be a number"))?;

    if amount <= 0.0 {
        return Err(AppError::validation("Amount must be greater than 0"));
    }
    if amount > max_amount {
        return Err(AppError::validation(format!(
            "Amount must not exceed {}",
            format_amount(max_amount)
        )));
    }

    Ok((amount * 100.0).round() / 100.0)
}
