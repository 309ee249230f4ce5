use serde::{Deserialize, Serialize};

use crate::domain::{
    Cents, DateRange, Expense, GlobalStats, Guest, GuestId, PaymentStatus, RangeStats, Tour,
    TourFinancials, TourLine, average_collection_per_guest, compute_range_filtered_stats,
    compute_tour_financials, guest_due, paid_percentage, seat_occupancy, tour_breakdown,
};

/// Everything the tour detail screen shows about one tour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourSummary {
    pub tour: Tour,
    pub financials: TourFinancials,
    pub guest_count: usize,
    pub expense_count: usize,
    pub average_collection: Cents,
    pub seat_occupancy: f64,
    pub dues: Vec<GuestDue>,
}

/// Payment progress of one guest against the seat price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestDue {
    pub guest_id: GuestId,
    pub guest_name: String,
    pub mobile_number: String,
    pub seat_number: String,
    pub paid: Cents,
    pub due: Cents,
    pub paid_percentage: f64,
    /// As declared, may disagree with `due`
    pub payment_status: PaymentStatus,
}

/// Date-range report: totals plus one line per tour in the range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeReport {
    pub range: DateRange,
    #[serde(flatten)]
    pub stats: RangeStats,
    pub lines: Vec<TourLine>,
}

/// Headline figures plus a short text for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: GlobalStats,
    pub insight: String,
}

impl TourSummary {
    pub fn build(tour: Tour, guests: &[Guest], expenses: &[Expense]) -> Self {
        let financials = compute_tour_financials(&tour, guests, expenses);

        let dues: Vec<GuestDue> = guests
            .iter()
            .filter(|g| g.tour_id == tour.id)
            .map(|g| GuestDue {
                guest_id: g.id.clone(),
                guest_name: g.guest_name.clone(),
                mobile_number: g.mobile_number.clone(),
                seat_number: g.seat_number.clone(),
                paid: g.paid_amount,
                due: guest_due(tour.price_per_seat, g),
                paid_percentage: paid_percentage(tour.price_per_seat, g),
                payment_status: g.payment_status,
            })
            .collect();

        let guest_count = dues.len();
        let expense_count = expenses.iter().filter(|e| e.tour_id == tour.id).count();

        Self {
            financials,
            guest_count,
            expense_count,
            average_collection: average_collection_per_guest(
                financials.total_collected,
                guest_count,
            ),
            seat_occupancy: seat_occupancy(tour.total_seats, guest_count),
            dues,
            tour,
        }
    }

    /// Guests who still owe something, regardless of their declared status.
    pub fn outstanding(&self) -> impl Iterator<Item = &GuestDue> {
        self.dues.iter().filter(|d| d.due > 0)
    }
}

impl RangeReport {
    pub fn build(
        tours: &[Tour],
        guests: &[Guest],
        expenses: &[Expense],
        range: DateRange,
    ) -> Self {
        let stats = compute_range_filtered_stats(tours, guests, expenses, range);
        let lines = tour_breakdown(&stats.tours, guests, expenses);
        Self {
            range,
            stats,
            lines,
        }
    }
}
