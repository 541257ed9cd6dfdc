//! Affordability projections for wishlist items.
//!
//! An item is affordable after `ceil(price / monthly_savings)` months of
//! saving. The target month is plain calendar arithmetic on (year, month),
//! so the day of month never pushes the label into the following month.

use chrono::{Datelike, NaiveDate};
use shared::{Affordability, Item, ItemListResponse, ItemView};
use std::cmp::Ordering;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Estimate when `price` can be paid for out of `monthly_savings`, counting
/// from `now`
pub fn estimate_affordability(price: f64, monthly_savings: f64, now: NaiveDate) -> Affordability {
    if !price.is_finite() || price <= 0.0 || !monthly_savings.is_finite() {
        return Affordability::Unknown;
    }
    if monthly_savings <= 0.0 {
        return Affordability::NoSavings;
    }

    let months = (price / monthly_savings).ceil();
    if !months.is_finite() || months > u32::MAX as f64 {
        return Affordability::Unknown;
    }
    let months_needed = months as u32;

    match add_months(now.year(), now.month(), months_needed) {
        Some((target_year, target_month)) => Affordability::Months {
            months_needed,
            target_month,
            target_year,
            target_label: month_label(target_year, target_month),
        },
        None => Affordability::Unknown,
    }
}

/// Move a 1-based (year, month) forward, carrying into the year
pub fn add_months(year: i32, month: u32, months: u32) -> Option<(i32, u32)> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let total = i64::from(year) * 12 + i64::from(month - 1) + i64::from(months);
    let target_year = i32::try_from(total.div_euclid(12)).ok()?;
    let target_month = total.rem_euclid(12) as u32 + 1;
    Some((target_year, target_month))
}

/// "Feb 2027"
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{} {}", name, year)
}

/// Headline and secondary text for the "when you can afford" column
pub fn describe_affordability(affordability: &Affordability) -> (String, Option<String>) {
    match affordability {
        Affordability::Unknown => ("—".to_string(), None),
        Affordability::NoSavings => ("No savings left with current numbers".to_string(), None),
        Affordability::Months {
            months_needed,
            target_label,
            ..
        } => {
            let plural = if *months_needed == 1 { "" } else { "s" };
            (
                format!("~{} month{}", months_needed, plural),
                Some(format!("Around {}", target_label)),
            )
        }
    }
}

/// High priority first, then cheapest first. Stable, so equal items keep
/// their insertion order.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| sort_price(a).partial_cmp(&sort_price(b)).unwrap_or(Ordering::Equal))
    });
}

fn sort_price(item: &Item) -> f64 {
    if item.price.is_finite() {
        item.price
    } else {
        0.0
    }
}

/// Sorted wishlist annotated with affordability
pub fn build_item_list(items: &[Item], monthly_savings: f64, now: NaiveDate) -> ItemListResponse {
    let mut sorted = items.to_vec();
    sort_items(&mut sorted);

    let items = sorted
        .into_iter()
        .map(|item| {
            let affordability = estimate_affordability(item.price, monthly_savings, now);
            let (when_text, when_detail) = describe_affordability(&affordability);
            ItemView {
                priority_label: format!("{} priority", item.priority.label()),
                item,
                affordability,
                when_text,
                when_detail,
            }
        })
        .collect();

    ItemListResponse {
        items,
        monthly_savings,
    }
}
