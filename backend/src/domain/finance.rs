//! Savings math for the finance card.
//!
//! Average expense only counts months with a positive amount, so rows the
//! user added but never filled in do not drag the average down.

use shared::{FinanceProfile, FinanceSummary, FinanceSummaryResponse};

/// Derive average monthly expense and projected monthly savings
pub fn compute_finance_summary(profile: &FinanceProfile) -> FinanceSummary {
    let income = finite_or_zero(profile.income);

    let expenses: Vec<f64> = profile
        .expense_history
        .iter()
        .map(|row| row.amount)
        .filter(|amount| amount.is_finite() && *amount > 0.0)
        .collect();

    let avg_expense = if expenses.is_empty() {
        0.0
    } else {
        expenses.iter().sum::<f64>() / expenses.len() as f64
    };

    FinanceSummary {
        avg_expense,
        monthly_savings: income - avg_expense,
    }
}

/// Summary plus the chip labels shown above the expense table
pub fn summarize_profile(profile: &FinanceProfile) -> FinanceSummaryResponse {
    let summary = compute_finance_summary(profile);
    let income = finite_or_zero(profile.income);
    let has_expenses = profile
        .expense_history
        .iter()
        .any(|row| row.amount.is_finite() && row.amount > 0.0);

    let avg_expense_label = if has_expenses {
        format!("Avg monthly expense: {}", format_currency(summary.avg_expense))
    } else {
        "Avg monthly expense: —".to_string()
    };

    let monthly_savings_label = if income == 0.0 {
        "Estimated monthly savings: — (set income)".to_string()
    } else if !has_expenses {
        "Estimated monthly savings: — (add expenses)".to_string()
    } else {
        format!(
            "Estimated monthly savings: {}",
            format_currency(summary.monthly_savings)
        )
    };

    FinanceSummaryResponse {
        summary,
        avg_expense_label,
        monthly_savings_label,
    }
}

/// Rupee amount rounded to whole units, "—" for anything non-finite
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "—".to_string();
    }
    // + 0.0 folds -0 into 0
    format!("₹{:.0}", amount.round() + 0.0)
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ExpenseEntry;

    fn profile(income: f64, amounts: &[f64]) -> FinanceProfile {
        FinanceProfile {
            income,
            expense_history: amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| ExpenseEntry {
                    id: format!("row{}", i),
                    label: String::new(),
                    amount: *amount,
                })
                .collect(),
        }
    }

    #[test]
    fn test_average_ignores_non_positive_and_non_finite() {
        let summary = compute_finance_summary(&profile(
            60000.0,
            &[20000.0, 0.0, -500.0, f64::NAN, 30000.0, f64::INFINITY],
        ));

        assert_eq!(summary.avg_expense, 25000.0);
        assert_eq!(summary.monthly_savings, 35000.0);
    }

    #[test]
    fn test_empty_or_zero_history_averages_to_zero() {
        assert_eq!(compute_finance_summary(&profile(1000.0, &[])).avg_expense, 0.0);
        assert_eq!(
            compute_finance_summary(&profile(1000.0, &[0.0, 0.0])).avg_expense,
            0.0
        );
    }

    #[test]
    fn test_savings_can_go_negative() {
        let summary = compute_finance_summary(&profile(10000.0, &[12000.0, 14000.0]));
        assert_eq!(summary.avg_expense, 13000.0);
        assert_eq!(summary.monthly_savings, -3000.0);
    }

    #[test]
    fn test_non_finite_income_counts_as_zero() {
        let summary = compute_finance_summary(&profile(f64::NAN, &[500.0]));
        assert_eq!(summary.monthly_savings, -500.0);
    }

    #[test]
    fn test_summary_labels() {
        let response = summarize_profile(&profile(0.0, &[]));
        assert_eq!(response.avg_expense_label, "Avg monthly expense: —");
        assert_eq!(
            response.monthly_savings_label,
            "Estimated monthly savings: — (set income)"
        );

        let response = summarize_profile(&profile(50000.0, &[0.0]));
        assert_eq!(
            response.monthly_savings_label,
            "Estimated monthly savings: — (add expenses)"
        );

        let response = summarize_profile(&profile(50000.0, &[20000.5, 20000.5]));
        assert_eq!(response.avg_expense_label, "Avg monthly expense: ₹20001");
        assert_eq!(
            response.monthly_savings_label,
            "Estimated monthly savings: ₹30000"
        );
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.4), "₹1234");
        assert_eq!(format_currency(-0.2), "₹0");
        assert_eq!(format_currency(f64::NAN), "—");
    }
}
