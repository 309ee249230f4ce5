use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, UserId, generate_id, money};

pub type TourId = String;

/// A bookable travel event with a fixed per-seat price and seat capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: TourId,
    /// Owning user
    pub user_id: UserId,
    pub tour_name: String,
    pub tour_date: NaiveDate,
    #[serde(default)]
    pub host_name: String,
    #[serde(with = "money::lenient_count", default)]
    pub total_seats: u32,
    /// Price every guest is expected to pay
    #[serde(with = "money::lenient", default)]
    pub price_per_seat: Cents,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// User-supplied fields for a new tour. Ids, owner and timestamp are assigned on creation.
#[derive(Debug, Clone)]
pub struct NewTour {
    pub tour_name: String,
    pub tour_date: NaiveDate,
    pub host_name: String,
    pub total_seats: u32,
    pub price_per_seat: Cents,
    pub description: String,
}

impl NewTour {
    pub fn new(tour_name: impl Into<String>, tour_date: NaiveDate, price_per_seat: Cents) -> Self {
        Self {
            tour_name: tour_name.into(),
            tour_date,
            host_name: String::new(),
            total_seats: 20,
            price_per_seat,
            description: String::new(),
        }
    }

    pub fn with_host(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    pub fn with_seats(mut self, total_seats: u32) -> Self {
        self.total_seats = total_seats;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Tour {
    pub fn new(user_id: impl Into<UserId>, draft: NewTour) -> Self {
        Self {
            id: generate_id("tour"),
            user_id: user_id.into(),
            tour_name: draft.tour_name,
            tour_date: draft.tour_date,
            host_name: draft.host_name,
            total_seats: draft.total_seats,
            price_per_seat: draft.price_per_seat,
            description: draft.description,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Case-insensitive substring match on tour name or host name.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.tour_name.to_lowercase().contains(&term)
            || self.host_name.to_lowercase().contains(&term)
    }
}
