//! Cleanup and parsing of plan text returned by the plan provider, plus the
//! plain-text rendering of a parsed plan.
//!
//! Providers are told to answer with bare JSON but regularly wrap it in a
//! markdown fence, sometimes with prose after the closing fence. Cleanup is
//! best-effort: a `{` or `}` inside prose before the real object still breaks
//! it, in which case parsing fails and the raw text is kept for diagnosis.

use regex::Regex;
use shared::Plan;
use std::fmt::Write;
use std::sync::OnceLock;

use super::errors::ParseError;
use super::finance::format_currency;

const FENCE: &str = "```";

fn fence_language() -> &'static Regex {
    static FENCE_LANGUAGE: OnceLock<Regex> = OnceLock::new();
    FENCE_LANGUAGE.get_or_init(|| {
        Regex::new(r"(?i)```json").unwrap_or_else(|_| Regex::new("$^").unwrap())
    })
}

/// Strip markdown fences around (or left inside) a JSON object
pub fn clean_plan_text(raw: &str) -> String {
    let mut content = raw.trim();

    if content.starts_with(FENCE) {
        if let (Some(first), Some(last)) = (content.find('{'), content.rfind('}')) {
            if first <= last {
                content = &content[first..=last];
            }
        }
    }

    let without_language = fence_language().replace_all(content, "");
    without_language.replace(FENCE, "").trim().to_string()
}

/// Turn provider text into a plan. Anything that is not a JSON object after
/// cleanup is an error; an empty plan is never substituted.
pub fn normalize_plan_text(raw: &str) -> Result<Plan, ParseError> {
    let cleaned = clean_plan_text(raw);

    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| ParseError {
        reason: e.to_string(),
        raw: raw.to_string(),
    })?;

    if !value.is_object() {
        return Err(ParseError {
            reason: "expected a JSON object".to_string(),
            raw: raw.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| ParseError {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Render a plan for display. Missing sections are left out rather than
/// treated as errors.
pub fn render_plan_text(plan: &Plan) -> String {
    let mut out = String::new();

    let summary = plan
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("Here's a suggested plan.");
    let _ = writeln!(out, "{}", summary);

    if !plan.assumptions.is_empty() {
        let _ = writeln!(out, "\nAssumptions");
        for assumption in &plan.assumptions {
            let _ = writeln!(out, "  - {}", assumption);
        }
    }

    if !plan.months.is_empty() {
        let _ = writeln!(out, "\nMonth-by-month plan");
        for month in &plan.months {
            let label = match (&month.label, month.month_offset) {
                (Some(label), _) if !label.trim().is_empty() => label.clone(),
                (_, Some(offset)) => format!("Month {}", offset),
                _ => "Month".to_string(),
            };
            let _ = writeln!(out, "\n{}", label);
            let _ = writeln!(
                out,
                "  Savings: {} · Used: {} · Leftover: {}",
                format_currency(month.budget.monthly_savings),
                format_currency(month.budget.used_for_purchases),
                format_currency(month.budget.leftover)
            );

            for purchase in &month.purchases {
                let price = purchase.price.map(format_currency).unwrap_or_else(|| "—".to_string());
                let _ = writeln!(out, "  * {} — {}", purchase.item_name, price);
                if let Some(notes) = purchase.notes.as_deref().filter(|n| !n.is_empty()) {
                    let _ = writeln!(out, "    {}", notes);
                }
            }

            if !month.tips.is_empty() {
                let _ = writeln!(out, "  Tips:");
                for tip in &month.tips {
                    let _ = writeln!(out, "    - {}", tip);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_is_parsed() {
        let plan = normalize_plan_text("```json\n{\"summary\":\"x\"}\n```").unwrap();
        assert_eq!(plan.summary.as_deref(), Some("x"));
        assert!(plan.months.is_empty());
    }

    #[test]
    fn test_bare_json_is_parsed() {
        let plan = normalize_plan_text("  {\"summary\":\"plain\",\"assumptions\":[\"a\"]}  ").unwrap();
        assert_eq!(plan.summary.as_deref(), Some("plain"));
        assert_eq!(plan.assumptions, vec!["a".to_string()]);
    }

    #[test]
    fn test_trailing_prose_after_fence_is_dropped() {
        let raw = "```JSON\n{\"summary\":\"s\",\"months\":[{\"monthOffset\":1}]}\n```\nHope this helps!";
        let plan = normalize_plan_text(raw).unwrap();
        assert_eq!(plan.months.len(), 1);
        assert_eq!(plan.months[0].month_offset, Some(1));
    }

    #[test]
    fn test_stray_fences_are_removed() {
        assert_eq!(clean_plan_text("{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(clean_plan_text("```json {\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_not_json_fails_with_raw_text() {
        let err = normalize_plan_text("not json at all").unwrap_err();
        assert_eq!(err.raw, "not json at all");
    }

    #[test]
    fn test_non_object_json_fails() {
        assert!(normalize_plan_text("[]").is_err());
        assert!(normalize_plan_text("\"summary\"").is_err());
        assert!(normalize_plan_text("").is_err());
    }

    #[test]
    fn test_render_full_plan() {
        let plan = normalize_plan_text(
            r#"{
                "summary": "Buy the phone first.",
                "assumptions": ["Income stays flat"],
                "months": [{
                    "monthOffset": 1,
                    "label": "Month 1",
                    "budget": {"monthlySavings": 30000, "usedForPurchases": 25000, "leftover": 5000},
                    "purchases": [{"itemId": "p1", "itemName": "Phone", "price": 25000, "notes": "Highest priority"}],
                    "tips": ["Cook at home"]
                }]
            }"#,
        )
        .unwrap();

        let text = render_plan_text(&plan);
        assert!(text.starts_with("Buy the phone first."));
        assert!(text.contains("Assumptions\n  - Income stays flat"));
        assert!(text.contains("Savings: ₹30000 · Used: ₹25000 · Leftover: ₹5000"));
        assert!(text.contains("  * Phone — ₹25000\n    Highest priority"));
        assert!(text.contains("  Tips:\n    - Cook at home"));
    }

    #[test]
    fn test_render_partial_plan() {
        let plan = normalize_plan_text(r#"{"months":[{"monthOffset":3,"purchases":[{"itemName":"Lamp"}]}]}"#)
            .unwrap();

        let text = render_plan_text(&plan);
        assert!(text.starts_with("Here's a suggested plan."));
        assert!(!text.contains("Assumptions"));
        assert!(text.contains("\nMonth 3\n"));
        assert!(text.contains("Savings: ₹0 · Used: ₹0 · Leftover: ₹0"));
        assert!(text.contains("  * Lamp — —"));
        assert!(!text.contains("Tips:"));
    }
}
