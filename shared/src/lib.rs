use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Key the whole planner state is persisted under
pub const STORAGE_KEY: &str = "dreamPurchasesApp_v2";

/// One month of historical spending entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub id: String,
    /// Free-form month label, e.g. "Jan 2025"
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    /// Total spent that month. Zero until the user fills it in.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub amount: f64,
}

/// Income plus the expense history used to derive monthly savings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceProfile {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub income: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expense_history: Vec<ExpenseEntry>,
}

/// Wishlist priority. Unrecognised values are kept as written, displayed as
/// `Low` and sorted after every known priority.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Sort rank, high first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Other(_) => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low | Priority::Other(_) => "Low",
        }
    }
}

impl From<serde_json::Value> for Priority {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Priority::default(),
            serde_json::Value::String(s) => match s.as_str() {
                "high" => Priority::High,
                "medium" => Priority::Medium,
                "low" => Priority::Low,
                _ => Priority::Other(s),
            },
            other => Priority::Other(other.to_string()),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => "high".to_string(),
            Priority::Medium => "medium".to_string(),
            Priority::Low => "low".to_string(),
            Priority::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A wishlist entry the user is saving for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub price: f64,
    /// Optional product URL, empty when not given
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
}

/// Everything that gets persisted: `{ finance, items }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub finance: FinanceProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

/// Derived numbers, recomputed on every read and never stored
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub avg_expense: f64,
    pub monthly_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummaryResponse {
    pub summary: FinanceSummary,
    pub avg_expense_label: String,
    pub monthly_savings_label: String,
}

/// When an item becomes affordable with the current monthly savings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Affordability {
    /// Price or savings are not usable numbers
    Unknown,
    /// Savings are zero or negative, nothing can be funded
    NoSavings,
    #[serde(rename_all = "camelCase")]
    Months {
        months_needed: u32,
        /// 1-based calendar month
        target_month: u32,
        target_year: i32,
        /// Short month name and year, e.g. "Feb 2027"
        target_label: String,
    },
}

/// An item as shown in the wishlist table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub priority_label: String,
    pub affordability: Affordability,
    /// Headline text, e.g. "~4 months"
    pub when_text: String,
    /// Secondary text, e.g. "Around Feb 2027"
    pub when_detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemListResponse {
    pub items: Vec<ItemView>,
    pub monthly_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemResponse {
    pub item: Item,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncomeRequest {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub income: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRowRequest {
    /// `None` (absent or null) leaves the label unchanged
    #[serde(default)]
    pub label: Option<String>,
    /// `None` (absent or null) leaves the amount unchanged; anything that is
    /// not a number becomes 0
    #[serde(default, deserialize_with = "optional_number_or_zero")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub removed: bool,
}

/// Finance numbers sent along with a plan request
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSnapshot {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub income: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub avg_expense: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub monthly_savings: f64,
}

/// Body of `POST /api/plan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub finance: FinanceSnapshot,
    pub items: Vec<Item>,
}

/// Month-by-month purchase schedule produced by the plan provider.
///
/// Every field is optional on the wire: missing lists read as empty and
/// missing budget numbers read as 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assumptions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub months: Vec<PlanMonth>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMonth {
    #[serde(default, deserialize_with = "optional_count", skip_serializing_if = "Option::is_none")]
    pub month_offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: MonthBudget,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purchases: Vec<PlanPurchase>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBudget {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub monthly_savings: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub used_for_purchases: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub leftover: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPurchase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_name: String,
    #[serde(default, deserialize_with = "optional_number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Error body returned by every API endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Reads a JSON value as a number the forgiving way: numeric strings are
/// parsed, booleans count as 1/0, and anything else becomes 0.
fn lenient_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_number(&value).unwrap_or(0.0))
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(lenient_number(&value))
}

fn optional_number_or_zero<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(lenient_number(&value).unwrap_or(0.0)))
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = optional_number(deserializer)?;
    Ok(number
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
