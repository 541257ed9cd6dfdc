//! Planner service: owns the live [`PlannerState`], persists it after every
//! successful change and tells subscribers what changed.
//!
//! Mutations run against a copy of the state. The copy only replaces the
//! live state once it has been saved, so rejected input and failed writes
//! leave both memory and storage untouched.
//!
//! Mutations write to storage synchronously while holding the state lock.
//! Async callers run them on the blocking pool.

use chrono::NaiveDate;
use shared::{
    AppData, CreateItemRequest, ExpenseEntry, FinanceProfile, FinanceSummaryResponse, Item,
    ItemListResponse, PlanRequest,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::errors::PlannerError;
use super::finance::summarize_profile;
use super::planner_state::PlannerState;
use crate::storage::StateRepository;

/// What part of the state a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerEvent {
    FinanceChanged,
    ItemsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Subscriber = Arc<dyn Fn(PlannerEvent, &AppData) + Send + Sync>;

#[derive(Clone)]
pub struct PlannerService {
    state: Arc<Mutex<PlannerState>>,
    repository: StateRepository,
    subscribers: Arc<Mutex<Vec<(SubscriptionId, Subscriber)>>>,
    next_subscription: Arc<AtomicU64>,
}

impl PlannerService {
    /// Load saved state from `repository` and start serving it
    pub fn new(repository: StateRepository) -> Self {
        let data = repository.load();
        info!(
            "Loaded planner state: {} expense rows, {} items",
            data.finance.expense_history.len(),
            data.items.len()
        );

        Self {
            state: Arc::new(Mutex::new(PlannerState::new(data))),
            repository,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_subscription: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a callback run after every persisted change
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PlannerEvent, &AppData) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.subscribers).push((id, Arc::new(callback)));
        id
    }

    /// Returns false when the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn snapshot(&self) -> AppData {
        lock(&self.state).data().clone()
    }

    pub fn finance(&self) -> FinanceProfile {
        lock(&self.state).data().finance.clone()
    }

    pub fn finance_summary(&self) -> FinanceSummaryResponse {
        summarize_profile(&lock(&self.state).data().finance)
    }

    pub fn item_list(&self, now: NaiveDate) -> ItemListResponse {
        lock(&self.state).item_list(now)
    }

    pub fn plan_request(&self) -> PlanRequest {
        lock(&self.state).plan_request()
    }

    pub fn set_income(&self, income: f64) -> Result<FinanceProfile, PlannerError> {
        self.mutate(PlannerEvent::FinanceChanged, |state| {
            state.set_income(income);
            Ok(state.data().finance.clone())
        })
    }

    pub fn add_expense_row(&self) -> Result<ExpenseEntry, PlannerError> {
        self.mutate(PlannerEvent::FinanceChanged, |state| {
            Ok(state.add_expense_row(new_id()))
        })
    }

    pub fn update_expense_row(
        &self,
        id: &str,
        label: Option<String>,
        amount: Option<f64>,
    ) -> Result<ExpenseEntry, PlannerError> {
        self.mutate(PlannerEvent::FinanceChanged, |state| {
            Ok(state.update_expense_row(id, label, amount)?)
        })
    }

    pub fn remove_expense_row(&self, id: &str) -> Result<bool, PlannerError> {
        self.remove(PlannerEvent::FinanceChanged, |state| state.remove_expense_row(id))
    }

    pub fn add_item(&self, request: CreateItemRequest) -> Result<Item, PlannerError> {
        self.mutate(PlannerEvent::ItemsChanged, |state| {
            Ok(state.add_item(new_id(), request)?)
        })
    }

    pub fn remove_item(&self, id: &str) -> Result<bool, PlannerError> {
        self.remove(PlannerEvent::ItemsChanged, |state| state.remove_item(id))
    }

    fn mutate<T>(
        &self,
        event: PlannerEvent,
        change: impl FnOnce(&mut PlannerState) -> Result<T, PlannerError>,
    ) -> Result<T, PlannerError> {
        self.apply(event, |state| change(state).map(|output| (output, true)))
    }

    fn remove(
        &self,
        event: PlannerEvent,
        change: impl FnOnce(&mut PlannerState) -> bool,
    ) -> Result<bool, PlannerError> {
        self.apply(event, |state| {
            let removed = change(state);
            if !removed {
                debug!("Nothing to remove, state unchanged");
            }
            Ok((removed, removed))
        })
    }

    /// Run `change` on a copy of the state; when it reports a change, save
    /// the copy, swap it in and notify subscribers
    fn apply<T>(
        &self,
        event: PlannerEvent,
        change: impl FnOnce(&mut PlannerState) -> Result<(T, bool), PlannerError>,
    ) -> Result<T, PlannerError> {
        let mut state = lock(&self.state);
        let mut next = state.clone();

        let (output, changed) = change(&mut next)?;
        if !changed {
            return Ok(output);
        }

        self.repository.save(next.data()).map_err(|e| {
            error!("Failed to save planner state: {:#}", e);
            PlannerError::Storage(format!("{:#}", e))
        })?;

        *state = next;
        let data = state.data().clone();
        drop(state);

        self.notify(event, &data);
        Ok(output)
    }

    fn notify(&self, event: PlannerEvent, data: &AppData) {
        let subscribers: Vec<Subscriber> = lock(&self.subscribers)
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();

        debug!("Notifying {} subscribers of {:?}", subscribers.len(), event);
        for subscriber in subscribers {
            subscriber(event, data);
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
