use crate::models::Expense;

/// Per-category slice of a period report.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// Share of the grand total, rounded to one decimal. Percentages are
    /// rounded independently per category and may not sum to exactly 100.
    pub percentage: f64,
}

/// Aggregated view over a date-filtered, ordered list of expenses.
#[derive(Debug)]
pub struct ReportSummary<'a> {
    pub grand_total: f64,
    pub count: usize,
    /// Categories ranked by total descending; ties keep first-encountered
    /// order.
    pub totals: Vec<CategoryTotal>,
    /// The requested page of individual records.
    pub page: &'a [Expense],
    pub page_index: usize,
    pub total_pages: usize,
    /// Zero-based global index of the first record on the page.
    pub page_start: usize,
}

/// Number of pages needed for `count` records.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size)
}

/// Global index of the first record on `page`. Saturates, since the page
/// index arrives from untrusted callback payloads.
pub fn page_offset(page: usize, page_size: usize) -> usize {
    page.saturating_mul(page_size)
}

/// The records belonging to `page`, plus the page's global start index.
///
/// A page index at or past the end yields an empty slice, not an error.
pub fn page_slice(records: &[Expense], page: usize, page_size: usize) -> (&[Expense], usize) {
    let start = page.saturating_mul(page_size).min(records.len());
    let end = (start + page_size).min(records.len());
    (&records[start..end], start)
}

/// Builds the report summary for an already-filtered, already-ordered list.
///
/// Returns `None` when there are no records; "no expenses in this period" is
/// a distinct outcome for the caller, never a division by zero here.
pub fn summarize(records: &[Expense], page: usize, page_size: usize) -> Option<ReportSummary<'_>> {
    if records.is_empty() {
        return None;
    }

    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut grand_total = 0.0;

    for record in records {
        grand_total += record.amount;
        match totals.iter_mut().find(|t| t.category == record.category) {
            Some(entry) => entry.total += record.amount,
            None => totals.push(CategoryTotal {
                category: record.category.clone(),
                total: record.amount,
                percentage: 0.0,
            }),
        }
    }

    // Stable sort keeps first-encountered order among equal totals.
    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    for entry in &mut totals {
        entry.percentage = (entry.total / grand_total * 1000.0).round() / 10.0;
    }

    let (page_records, page_start) = page_slice(records, page, page_size);

    Some(ReportSummary {
        grand_total,
        count: records.len(),
        totals,
        page: page_records,
        page_index: page,
        total_pages: total_pages(records.len(), page_size),
        page_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense(category: &str, amount: f64) -> Expense {
        Expense {
            id: 1,
            owner_id: 1,
            category: category.to_string(),
            description: "test".to_string(),
            amount,
            date: "2024-01-01".parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_is_a_distinct_outcome() {
        assert!(summarize(&[], 0, 5).is_none());
    }

    #[test]
    fn test_ranking_and_percentages() {
        let records = vec![expense("A", 100.0), expense("B", 300.0)];
        let summary = summarize(&records, 0, 5).unwrap();

        assert_eq!(summary.grand_total, 400.0);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.totals[0].category, "B");
        assert_eq!(summary.totals[0].percentage, 75.0);
        assert_eq!(summary.totals[1].category, "A");
        assert_eq!(summary.totals[1].percentage, 25.0);
    }

    #[test]
    fn test_tie_break_keeps_first_encountered_order() {
        let records = vec![expense("A", 50.0), expense("B", 50.0), expense("C", 50.0)];
        let summary = summarize(&records, 0, 5).unwrap();
        let order: Vec<&str> = summary.totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn test_page_offset_saturates_instead_of_overflowing() {
        assert_eq!(page_offset(0, 5), 0);
        assert_eq!(page_offset(3, 5), 15);
        assert_eq!(page_offset(usize::MAX, 5), usize::MAX);
        assert_eq!(page_offset(usize::MAX / 2, 3), usize::MAX);
    }

    #[test]
    fn test_page_past_the_end_is_empty_not_an_error() {
        let records: Vec<Expense> = (0..7).map(|i| expense("A", i as f64 + 1.0)).collect();

        let summary = summarize(&records, 0, 5).unwrap();
        assert_eq!(summary.page.len(), 5);
        assert_eq!(summary.page_start, 0);
        assert_eq!(summary.total_pages, 2);

        let summary = summarize(&records, 1, 5).unwrap();
        assert_eq!(summary.page.len(), 2);
        assert_eq!(summary.page_start, 5);

        let summary = summarize(&records, 9, 5).unwrap();
        assert!(summary.page.is_empty());
        assert_eq!(summary.total_pages, 2);
    }

    #[test]
    fn test_summary_is_pure_and_repeatable() {
        let records = vec![expense("A", 100.0), expense("B", 300.0)];
        let first = summarize(&records, 0, 5).unwrap();
        let second = summarize(&records, 0, 5).unwrap();
        assert_eq!(first.grand_total, second.grand_total);
        assert_eq!(first.totals, second.totals);
        assert_eq!(first.page, second.page);
    }
}
