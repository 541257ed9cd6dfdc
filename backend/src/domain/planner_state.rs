//! The planner's application state and the rules for changing it.
//!
//! `PlannerState` is a plain value: every operation takes the state, checks
//! its input and changes the state in place. It performs no I/O. Persisting
//! and notifying after a change is the job of
//! [`PlannerService`](super::planner_service::PlannerService).

use chrono::NaiveDate;
use shared::{
    AppData, CreateItemRequest, ExpenseEntry, FinanceSnapshot, FinanceSummary, Item,
    ItemListResponse, PlanRequest,
};

use super::affordability::build_item_list;
use super::errors::ValidationError;
use super::finance::{compute_finance_summary, finite_or_zero};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerState {
    data: AppData,
}

impl PlannerState {
    pub fn new(data: AppData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn into_data(self) -> AppData {
        self.data
    }

    pub fn summary(&self) -> FinanceSummary {
        compute_finance_summary(&self.data.finance)
    }

    pub fn set_income(&mut self, income: f64) {
        self.data.finance.income = finite_or_zero(income);
    }

    /// Append an empty expense month for the user to fill in
    pub fn add_expense_row(&mut self, id: String) -> ExpenseEntry {
        let row = ExpenseEntry {
            id,
            label: String::new(),
            amount: 0.0,
        };
        self.data.finance.expense_history.push(row.clone());
        row
    }

    pub fn update_expense_row(
        &mut self,
        id: &str,
        label: Option<String>,
        amount: Option<f64>,
    ) -> Result<ExpenseEntry, ValidationError> {
        let row = self
            .data
            .finance
            .expense_history
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| ValidationError::UnknownExpenseRow(id.to_string()))?;

        if let Some(label) = label {
            row.label = label.trim().to_string();
        }
        if let Some(amount) = amount {
            row.amount = finite_or_zero(amount);
        }

        Ok(row.clone())
    }

    /// Returns false when no row had that id
    pub fn remove_expense_row(&mut self, id: &str) -> bool {
        let before = self.data.finance.expense_history.len();
        self.data.finance.expense_history.retain(|row| row.id != id);
        self.data.finance.expense_history.len() != before
    }

    /// Validate and append a wishlist item
    pub fn add_item(&mut self, id: String, request: CreateItemRequest) -> Result<Item, ValidationError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyItemName);
        }
        if !request.price.is_finite() || request.price <= 0.0 {
            return Err(ValidationError::InvalidPrice);
        }

        let item = Item {
            id,
            name: name.to_string(),
            price: request.price,
            link: request.link.trim().to_string(),
            priority: request.priority,
        };
        self.data.items.push(item.clone());
        Ok(item)
    }

    /// Returns false when no item had that id
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.data.items.len();
        self.data.items.retain(|item| item.id != id);
        self.data.items.len() != before
    }

    /// Wishlist sorted for display, each item annotated with affordability
    pub fn item_list(&self, now: NaiveDate) -> ItemListResponse {
        build_item_list(&self.data.items, self.summary().monthly_savings, now)
    }

    /// Snapshot sent to the plan endpoint
    pub fn plan_request(&self) -> PlanRequest {
        let summary = self.summary();
        PlanRequest {
            finance: FinanceSnapshot {
                income: finite_or_zero(self.data.finance.income),
                avg_expense: summary.avg_expense,
                monthly_savings: summary.monthly_savings,
            },
            items: self.data.items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Priority;

    fn item_request(name: &str, price: f64) -> CreateItemRequest {
        CreateItemRequest {
            name: name.to_string(),
            price,
            link: String::new(),
            priority: Priority::default(),
        }
    }

    #[test]
    fn test_expense_rows_lifecycle() {
        let mut state = PlannerState::default();

        let row = state.add_expense_row("r1".to_string());
        assert_eq!(row.amount, 0.0);
        assert_eq!(row.label, "");

        let row = state
            .update_expense_row("r1", Some("  Sep 2026 ".to_string()), Some(32000.0))
            .unwrap();
        assert_eq!(row.label, "Sep 2026");
        assert_eq!(row.amount, 32000.0);

        let row = state.update_expense_row("r1", None, Some(f64::NAN)).unwrap();
        assert_eq!(row.label, "Sep 2026");
        assert_eq!(row.amount, 0.0);

        assert_eq!(
            state.update_expense_row("missing", None, Some(1.0)),
            Err(ValidationError::UnknownExpenseRow("missing".to_string()))
        );

        assert!(state.remove_expense_row("r1"));
        assert!(!state.remove_expense_row("r1"));
        assert!(state.data().finance.expense_history.is_empty());
    }

    #[test]
    fn test_income_is_sanitised() {
        let mut state = PlannerState::default();
        state.set_income(f64::INFINITY);
        assert_eq!(state.data().finance.income, 0.0);
        state.set_income(55000.0);
        assert_eq!(state.data().finance.income, 55000.0);
    }

    #[test]
    fn test_add_item_validation() {
        let mut state = PlannerState::default();

        assert_eq!(
            state.add_item("a".to_string(), item_request("   ", 100.0)),
            Err(ValidationError::EmptyItemName)
        );
        assert_eq!(
            state.add_item("b".to_string(), item_request("Shoes", 0.0)),
            Err(ValidationError::InvalidPrice)
        );
        assert_eq!(
            state.add_item("c".to_string(), item_request("Shoes", f64::NAN)),
            Err(ValidationError::InvalidPrice)
        );
        assert!(state.data().items.is_empty());

        let mut request = item_request(" Shoes ", 4500.0);
        request.link = " https://shop.example/shoes ".to_string();
        let item = state.add_item("d".to_string(), request).unwrap();
        assert_eq!(item.name, "Shoes");
        assert_eq!(item.link, "https://shop.example/shoes");
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(state.data().items, vec![item]);

        assert!(state.remove_item("d"));
        assert!(!state.remove_item("d"));
    }

    #[test]
    fn test_plan_request_carries_summary() {
        let mut state = PlannerState::default();
        state.set_income(60000.0);
        state.add_expense_row("r1".to_string());
        state.update_expense_row("r1", None, Some(40000.0)).unwrap();
        state.add_item("i1".to_string(), item_request("Bike", 30000.0)).unwrap();

        let request = state.plan_request();
        assert_eq!(request.finance.income, 60000.0);
        assert_eq!(request.finance.avg_expense, 40000.0);
        assert_eq!(request.finance.monthly_savings, 20000.0);
        assert_eq!(request.items.len(), 1);

        let list = state.item_list(NaiveDate::from_ymd_opt(2026, 11, 5).unwrap());
        assert_eq!(list.monthly_savings, 20000.0);
        assert_eq!(list.items[0].when_text, "~2 months");
        assert_eq!(list.items[0].when_detail.as_deref(), Some("Around Jan 2027"));
    }
}
