use tracing::{debug, info, instrument};

use crate::domain::{
    Cents, DateRange, Expense, ExpenseCategory, GlobalStats, Guest, NewGuest, NewTour, Tour, User,
    compute_global_stats, search_tours,
};
use crate::storage::{
    BlobStore, DATA_STORE_KEY, DataStore, LedgerSnapshot, MemoryBlobStore, RemovedTour,
    SESSION_KEY, SqliteBlobStore,
};

use super::{AppError, Dashboard, InsightProvider, RangeReport, TourSummary, dashboard_insight};

/// Application service for the agency back office.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// The service owns its persistence collaborator; there is no global state.
pub struct AgencyService {
    store: Box<dyn BlobStore>,
}

impl AgencyService {
    /// Create a service over any blob store.
    pub fn new(store: impl BlobStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// A service whose data lives only as long as the value.
    pub fn in_memory() -> Self {
        Self::new(MemoryBlobStore::new())
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = SqliteBlobStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = SqliteBlobStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }

    async fn load(&self) -> Result<DataStore, AppError> {
        match self.store.load(DATA_STORE_KEY).await? {
            Some(json) => {
                DataStore::from_json(&json).map_err(|e| AppError::CorruptStore(e.to_string()))
            }
            None => Ok(DataStore::default()),
        }
    }

    async fn persist(&self, data: &DataStore) -> Result<(), AppError> {
        let json = data
            .to_json()
            .map_err(|e| AppError::Storage(anyhow::Error::new(e)))?;
        self.store.save(DATA_STORE_KEY, &json).await?;
        debug!(
            tours = data.tours.len(),
            guests = data.guests.len(),
            expenses = data.expenses.len(),
            "persisted data store"
        );
        Ok(())
    }

    // ========================
    // User operations
    // ========================

    /// Register a new user and log them in.
    #[instrument(skip(self))]
    pub async fn register_user(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<User, AppError> {
        let name = require_text("name", name)?;
        let email = require_text("email", email)?;

        let mut data = self.load().await?;
        if data.find_user_by_email(&email).is_some() {
            return Err(AppError::UserAlreadyExists(email));
        }

        let mut user = User::new(name, email);
        if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
            user = user.with_phone(phone);
        }

        data.users.push(user.clone());
        self.persist(&data).await?;
        self.store.save(SESSION_KEY, &user.email).await?;

        info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Log in by email. Passwords are not part of this ledger.
    #[instrument(skip(self))]
    pub async fn login(&self, email: &str) -> Result<User, AppError> {
        let data = self.load().await?;
        let user = data
            .find_user_by_email(email)
            .cloned()
            .ok_or_else(|| AppError::UserNotFound(email.to_string()))?;

        self.store.save(SESSION_KEY, &user.email).await?;
        Ok(user)
    }

    /// Forget the current session.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.store.remove(SESSION_KEY).await?;
        Ok(())
    }

    /// The logged-in user, if the session points at a user that still exists.
    pub async fn current_user(&self) -> Result<Option<User>, AppError> {
        let Some(email) = self.store.load(SESSION_KEY).await? else {
            return Ok(None);
        };
        let data = self.load().await?;
        Ok(data.find_user_by_email(&email).cloned())
    }

    /// The logged-in user, or `NotLoggedIn`.
    pub async fn require_user(&self) -> Result<User, AppError> {
        self.current_user().await?.ok_or(AppError::NotLoggedIn)
    }

    /// Everything the user owns, as one read-only snapshot.
    pub async fn load_all(&self, user_id: &str) -> Result<LedgerSnapshot, AppError> {
        Ok(self.load().await?.snapshot_for(user_id))
    }

    // ========================
    // Tour operations
    // ========================

    /// Create a new tour owned by `user_id`.
    #[instrument(skip(self, draft), fields(tour_name = %draft.tour_name))]
    pub async fn create_tour(&self, user_id: &str, draft: NewTour) -> Result<Tour, AppError> {
        if draft.tour_name.trim().is_empty() {
            return Err(AppError::InvalidInput("tour name must not be empty".into()));
        }
        validate_amount("price per seat", draft.price_per_seat)?;

        let mut data = self.load().await?;
        if !data.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        let tour = Tour::new(user_id, draft);
        data.tours.push(tour.clone());
        self.persist(&data).await?;

        info!(tour_id = %tour.id, "created tour");
        Ok(tour)
    }

    /// List the user's tours in creation order.
    pub async fn list_tours(&self, user_id: &str) -> Result<Vec<Tour>, AppError> {
        Ok(self.load().await?.tours_for(user_id))
    }

    /// Tours whose name or host contains `term`.
    pub async fn search_tours(&self, user_id: &str, term: &str) -> Result<Vec<Tour>, AppError> {
        let tours = self.list_tours(user_id).await?;
        Ok(search_tours(&tours, term).into_iter().cloned().collect())
    }

    /// Get one of the user's tours.
    pub async fn get_tour(&self, user_id: &str, tour_id: &str) -> Result<Tour, AppError> {
        let data = self.load().await?;
        owned_tour(&data, user_id, tour_id).cloned()
    }

    /// Delete a tour and, in the same write, every guest and expense on it.
    #[instrument(skip(self))]
    pub async fn delete_tour(&self, user_id: &str, tour_id: &str) -> Result<RemovedTour, AppError> {
        let mut data = self.load().await?;
        owned_tour(&data, user_id, tour_id)?;

        let removed = data
            .remove_tour_cascade(tour_id)
            .ok_or_else(|| AppError::TourNotFound(tour_id.to_string()))?;
        self.persist(&data).await?;

        info!(
            guests_removed = removed.guests_removed,
            expenses_removed = removed.expenses_removed,
            "deleted tour"
        );
        Ok(removed)
    }

    // ========================
    // Guest operations
    // ========================

    /// Book a guest on one of the user's tours.
    #[instrument(skip(self, draft), fields(guest_name = %draft.guest_name))]
    pub async fn add_guest(
        &self,
        user_id: &str,
        tour_id: &str,
        draft: NewGuest,
    ) -> Result<Guest, AppError> {
        if draft.guest_name.trim().is_empty() {
            return Err(AppError::InvalidInput("guest name must not be empty".into()));
        }
        validate_amount("paid amount", draft.paid_amount)?;

        let mut data = self.load().await?;
        owned_tour(&data, user_id, tour_id)?;

        let guest = Guest::new(tour_id, user_id, draft);
        data.guests.push(guest.clone());
        self.persist(&data).await?;

        info!(guest_id = %guest.id, "added guest");
        Ok(guest)
    }

    /// Guests booked on one of the user's tours.
    pub async fn list_guests(&self, user_id: &str, tour_id: &str) -> Result<Vec<Guest>, AppError> {
        let data = self.load().await?;
        owned_tour(&data, user_id, tour_id)?;
        Ok(data
            .guests
            .iter()
            .filter(|g| g.tour_id == tour_id)
            .cloned()
            .collect())
    }

    /// Delete a single guest. Other records are untouched.
    #[instrument(skip(self))]
    pub async fn delete_guest(&self, user_id: &str, guest_id: &str) -> Result<Guest, AppError> {
        let mut data = self.load().await?;
        let owned = data
            .guests
            .iter()
            .find(|g| g.id == guest_id)
            .is_some_and(|g| owns_tour(&data, user_id, &g.tour_id));
        if !owned {
            return Err(AppError::GuestNotFound(guest_id.to_string()));
        }

        let guest = data
            .remove_guest(guest_id)
            .ok_or_else(|| AppError::GuestNotFound(guest_id.to_string()))?;
        self.persist(&data).await?;
        Ok(guest)
    }

    // ========================
    // Expense operations
    // ========================

    /// Record an expense against one of the user's tours.
    #[instrument(skip(self, note))]
    pub async fn add_expense(
        &self,
        user_id: &str,
        tour_id: &str,
        category: ExpenseCategory,
        amount: Cents,
        note: Option<String>,
    ) -> Result<Expense, AppError> {
        validate_amount("expense amount", amount)?;

        let mut data = self.load().await?;
        owned_tour(&data, user_id, tour_id)?;

        let mut expense = Expense::new(tour_id, user_id, category, amount);
        if let Some(note) = note {
            expense = expense.with_note(note);
        }
        data.expenses.push(expense.clone());
        self.persist(&data).await?;

        info!(expense_id = %expense.id, "added expense");
        Ok(expense)
    }

    /// Expenses recorded on one of the user's tours.
    pub async fn list_expenses(
        &self,
        user_id: &str,
        tour_id: &str,
    ) -> Result<Vec<Expense>, AppError> {
        let data = self.load().await?;
        owned_tour(&data, user_id, tour_id)?;
        Ok(data
            .expenses
            .iter()
            .filter(|e| e.tour_id == tour_id)
            .cloned()
            .collect())
    }

    /// Delete a single expense.
    #[instrument(skip(self))]
    pub async fn delete_expense(
        &self,
        user_id: &str,
        expense_id: &str,
    ) -> Result<Expense, AppError> {
        let mut data = self.load().await?;
        let owned = data
            .expenses
            .iter()
            .find(|e| e.id == expense_id)
            .is_some_and(|e| owns_tour(&data, user_id, &e.tour_id));
        if !owned {
            return Err(AppError::ExpenseNotFound(expense_id.to_string()));
        }

        let expense = data
            .remove_expense(expense_id)
            .ok_or_else(|| AppError::ExpenseNotFound(expense_id.to_string()))?;
        self.persist(&data).await?;
        Ok(expense)
    }

    // ========================
    // Reporting operations
    // ========================

    /// Financial summary of one tour with per-guest dues.
    pub async fn tour_summary(&self, user_id: &str, tour_id: &str) -> Result<TourSummary, AppError> {
        let data = self.load().await?;
        let tour = owned_tour(&data, user_id, tour_id)?.clone();
        Ok(TourSummary::build(tour, &data.guests, &data.expenses))
    }

    /// Totals across all of the user's tours.
    pub async fn global_stats(&self, user_id: &str) -> Result<GlobalStats, AppError> {
        let data = self.load().await?;
        Ok(compute_global_stats(
            user_id,
            &data.tours,
            &data.guests,
            &data.expenses,
        ))
    }

    /// Totals and per-tour lines for the user's tours inside `range`.
    #[instrument(skip(self))]
    pub async fn range_report(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<RangeReport, AppError> {
        let snapshot = self.load_all(user_id).await?;
        Ok(RangeReport::build(
            &snapshot.tours,
            &snapshot.guests,
            &snapshot.expenses,
            range,
        ))
    }

    /// Global stats plus the dashboard text. The text never blocks the figures:
    /// a missing or failing provider yields the static fallback.
    pub async fn dashboard(
        &self,
        user_id: &str,
        provider: Option<&dyn InsightProvider>,
    ) -> Result<Dashboard, AppError> {
        let stats = self.global_stats(user_id).await?;
        let insight = dashboard_insight(provider, &stats).await;
        Ok(Dashboard { stats, insight })
    }
}

/// A tour that exists and belongs to `user_id`. Someone else's tour is reported
/// as missing.
fn owned_tour<'a>(data: &'a DataStore, user_id: &str, tour_id: &str) -> Result<&'a Tour, AppError> {
    data.find_tour(tour_id)
        .filter(|t| t.is_owned_by(user_id))
        .ok_or_else(|| AppError::TourNotFound(tour_id.to_string()))
}

fn owns_tour(data: &DataStore, user_id: &str, tour_id: &str) -> bool {
    owned_tour(data, user_id, tour_id).is_ok()
}

fn validate_amount(what: &str, amount: Cents) -> Result<(), AppError> {
    if amount < 0 {
        return Err(AppError::InvalidAmount(format!(
            "{} must not be negative",
            what
        )));
    }
    Ok(())
}

fn require_text(field: &str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
