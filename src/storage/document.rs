use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Expense, Guest, Tour, User};

/// Key of the single document holding every collection.
pub const DATA_STORE_KEY: &str = "TUC_DATA_STORE";

/// Key holding the email of the logged-in user.
pub const SESSION_KEY: &str = "TUC_SESSION_EMAIL";

/// Every collection, persisted together as one JSON blob.
///
/// Rewriting the whole document on each mutation is what makes a cascading tour
/// delete atomic: either the new document is saved or the old one stays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataStore {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tours: Vec<Tour>,
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// Read-only view of one user's tours and everything booked or spent on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub tours: Vec<Tour>,
    pub guests: Vec<Guest>,
    pub expenses: Vec<Expense>,
}

/// What a cascading tour delete took out of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedTour {
    pub tour: Tour,
    pub guests_removed: usize,
    pub expenses_removed: usize,
}

impl DataStore {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_email(email))
    }

    pub fn find_tour(&self, tour_id: &str) -> Option<&Tour> {
        self.tours.iter().find(|t| t.id == tour_id)
    }

    /// Tours owned by `user_id`, in creation order.
    pub fn tours_for(&self, user_id: &str) -> Vec<Tour> {
        self.tours
            .iter()
            .filter(|t| t.is_owned_by(user_id))
            .cloned()
            .collect()
    }

    /// The user's tours plus the guests and expenses attached to them.
    /// Guests and expenses are picked by tour, not by their own `user_id`.
    pub fn snapshot_for(&self, user_id: &str) -> LedgerSnapshot {
        let tours = self.tours_for(user_id);
        let tour_ids: HashSet<&str> = tours.iter().map(|t| t.id.as_str()).collect();

        LedgerSnapshot {
            guests: self
                .guests
                .iter()
                .filter(|g| tour_ids.contains(g.tour_id.as_str()))
                .cloned()
                .collect(),
            expenses: self
                .expenses
                .iter()
                .filter(|e| tour_ids.contains(e.tour_id.as_str()))
                .cloned()
                .collect(),
            tours,
        }
    }

    /// Remove a tour together with all of its guests and expenses.
    pub fn remove_tour_cascade(&mut self, tour_id: &str) -> Option<RemovedTour> {
        let index = self.tours.iter().position(|t| t.id == tour_id)?;
        let tour = self.tours.remove(index);

        let guests_before = self.guests.len();
        self.guests.retain(|g| g.tour_id != tour_id);
        let expenses_before = self.expenses.len();
        self.expenses.retain(|e| e.tour_id != tour_id);

        Some(RemovedTour {
            tour,
            guests_removed: guests_before - self.guests.len(),
            expenses_removed: expenses_before - self.expenses.len(),
        })
    }

    pub fn remove_guest(&mut self, guest_id: &str) -> Option<Guest> {
        let index = self.guests.iter().position(|g| g.id == guest_id)?;
        Some(self.guests.remove(index))
    }

    pub fn remove_expense(&mut self, expense_id: &str) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == expense_id)?;
        Some(self.expenses.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{ExpenseCategory, NewGuest, NewTour};

    fn sample_store() -> (DataStore, Tour, Tour) {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let kept = Tour::new("u1", NewTour::new("Kept", day, 1000));
        let doomed = Tour::new("u1", NewTour::new("Doomed", day, 1000));

        let store = DataStore {
            users: vec![User::new("Owner", "owner@example.com")],
            tours: vec![kept.clone(), doomed.clone()],
            guests: vec![
                Guest::new(&kept.id, "u1", NewGuest::new("A", 100)),
                Guest::new(&doomed.id, "u1", NewGuest::new("B", 200)),
                Guest::new(&doomed.id, "u1", NewGuest::new("C", 300)),
            ],
            expenses: vec![
                Expense::new(&doomed.id, "u1", ExpenseCategory::Hotel, 50),
                Expense::new(&kept.id, "u1", ExpenseCategory::Food, 20),
            ],
        };
        (store, kept, doomed)
    }

    #[test]
    fn test_cascade_removes_children() {
        let (mut store, kept, doomed) = sample_store();

        let removed = store.remove_tour_cascade(&doomed.id).unwrap();

        assert_eq!(removed.tour.id, doomed.id);
        assert_eq!(removed.guests_removed, 2);
        assert_eq!(removed.expenses_removed, 1);
        assert_eq!(store.tours, vec![kept.clone()]);
        assert!(store.guests.iter().all(|g| g.tour_id == kept.id));
        assert!(store.expenses.iter().all(|e| e.tour_id == kept.id));
    }

    #[test]
    fn test_cascade_unknown_tour_is_noop() {
        let (mut store, _, _) = sample_store();
        let before = store.clone();

        assert!(store.remove_tour_cascade("tour_missing").is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn test_snapshot_follows_tour_ownership() {
        let (mut store, kept, _) = sample_store();
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let other = Tour::new("u2", NewTour::new("Other", day, 0));
        store.tours.push(other.clone());
        // Booked on someone else's tour, tagged with u1
        store
            .guests
            .push(Guest::new(&other.id, "u1", NewGuest::new("D", 999)));

        let snapshot = store.snapshot_for("u1");

        assert_eq!(snapshot.tours.len(), 2);
        assert_eq!(snapshot.guests.len(), 3);
        assert!(snapshot.guests.iter().all(|g| g.tour_id != other.id));
        assert_eq!(snapshot.expenses.len(), 2);
        assert!(store.snapshot_for("u2").guests.iter().any(|g| g.tour_id == other.id));
        assert!(store.snapshot_for("u1").tours.contains(&kept));
    }

    #[test]
    fn test_reads_legacy_document() {
        let json = r#"{
            "users": [{"id": "1718000000000", "name": "Rahim", "email": "rahim@example.com",
                       "role": "admin", "createdAt": "2024-06-10T08:00:00.000Z"}],
            "tours": [{"id": "tour_1", "userId": "1718000000000", "tourName": "Sajek",
                       "tourDate": "2024-03-05", "hostName": "Karim", "totalSeats": 20,
                       "pricePerSeat": 1000, "description": "", "createdAt": "2024-01-01T00:00:00.000Z"}],
            "guests": [{"id": "guest_1", "tourId": "tour_1", "userId": "1718000000000",
                        "guestName": "Ayesha", "mobileNumber": "", "seatNumber": "1",
                        "paidAmount": "400", "paymentStatus": "Partial",
                        "createdAt": "2024-01-02T00:00:00.000Z"}]
        }"#;

        let store = DataStore::from_json(json).unwrap();

        assert_eq!(store.users.len(), 1);
        assert_eq!(store.guests[0].paid_amount, 40000);
        assert!(store.expenses.is_empty());
        assert!(store.find_user_by_email("RAHIM@example.com").is_some());
        assert!(store.find_tour("tour_1").is_some());
    }

    #[test]
    fn test_writes_camel_case_amounts_in_units() {
        let (store, _, _) = sample_store();
        let value: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();

        assert_eq!(value["tours"][0]["pricePerSeat"], 10);
        assert_eq!(value["guests"][0]["paidAmount"], 1);
        assert!(value["guests"][0].get("tourId").is_some());
    }
}
