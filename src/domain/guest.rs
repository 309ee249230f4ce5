use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, TourId, UserId, generate_id, money};

pub type GuestId = String;

/// Payment progress as declared by whoever booked the guest.
///
/// Not derived from the paid amount: a guest marked `Paid` may still owe money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Partial,
    #[default]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "partial" => Ok(PaymentStatus::Partial),
            "unpaid" => Ok(PaymentStatus::Unpaid),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A booking record tied to one tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub tour_id: TourId,
    /// Who recorded the booking. Not authoritative for ownership, the tour is.
    pub user_id: UserId,
    pub guest_name: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub seat_number: String,
    #[serde(with = "money::lenient", default)]
    pub paid_amount: Cents,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGuest {
    pub guest_name: String,
    pub mobile_number: String,
    pub seat_number: String,
    pub paid_amount: Cents,
    pub payment_status: PaymentStatus,
}

impl NewGuest {
    pub fn new(guest_name: impl Into<String>, paid_amount: Cents) -> Self {
        Self {
            guest_name: guest_name.into(),
            mobile_number: String::new(),
            seat_number: String::new(),
            paid_amount,
            payment_status: PaymentStatus::Unpaid,
        }
    }

    pub fn with_mobile(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = mobile_number.into();
        self
    }

    pub fn with_seat(mut self, seat_number: impl Into<String>) -> Self {
        self.seat_number = seat_number.into();
        self
    }

    pub fn with_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }
}

impl Guest {
    pub fn new(tour_id: impl Into<TourId>, user_id: impl Into<UserId>, draft: NewGuest) -> Self {
        Self {
            id: generate_id("guest"),
            tour_id: tour_id.into(),
            user_id: user_id.into(),
            guest_name: draft.guest_name,
            mobile_number: draft.mobile_number,
            seat_number: draft.seat_number,
            paid_amount: draft.paid_amount,
            payment_status: draft.payment_status,
            created_at: Utc::now(),
        }
    }
}
