//! Financial aggregation over tours, guests and expenses.
//!
//! Everything here is a pure function over borrowed slices. Nothing is cached:
//! callers pass the current snapshot and get freshly computed figures back.
//! Amounts are already sanitized cents by the time they reach this module.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, Expense, Guest, Tour, TourId};

/// Money figures for a single tour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourFinancials {
    /// Sum of what guests have paid so far
    pub total_collected: Cents,
    /// Sum of per-guest dues, each clamped at zero
    pub total_unpaid: Cents,
    /// Collected plus outstanding dues. Unbooked seats are not counted.
    pub projected_revenue: Cents,
    pub total_expenses: Cents,
    pub current_net_profit: Cents,
    pub projected_net_profit: Cents,
}

/// Totals across a set of tours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_tours: usize,
    pub total_guests: usize,
    pub total_income: Cents,
    pub total_expenses: Cents,
    pub net_profit: Cents,
}

/// Totals for the tours falling inside a [`DateRange`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    #[serde(flatten)]
    pub stats: GlobalStats,
    pub tours: Vec<Tour>,
    pub guest_count: usize,
}

/// Inclusive tour-date window. Either bound may be left open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// No bounds: every date matches.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn on(date: NaiveDate) -> Self {
        Self::new(Some(date), Some(date))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// One row of the per-tour breakdown shown in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourLine {
    pub tour_id: TourId,
    pub tour_name: String,
    pub tour_date: NaiveDate,
    pub host_name: String,
    pub guest_count: usize,
    pub income: Cents,
    pub expenses: Cents,
    pub profit: Cents,
}

/// What a guest still owes against the seat price. Overpayment counts as zero.
pub fn guest_due(price_per_seat: Cents, guest: &Guest) -> Cents {
    price_per_seat.saturating_sub(guest.paid_amount).max(0)
}

/// Share of the seat price a guest has paid, as a percentage capped at 100.
/// A free tour reports 100: nothing is owed.
pub fn paid_percentage(price_per_seat: Cents, guest: &Guest) -> f64 {
    if price_per_seat <= 0 {
        return 100.0;
    }
    (guest.paid_amount as f64 / price_per_seat as f64 * 100.0).clamp(0.0, 100.0)
}

/// Booked share of the seats, capped at 100. A tour with no seats reports 0.
pub fn seat_occupancy(total_seats: u32, guest_count: usize) -> f64 {
    if total_seats == 0 {
        return 0.0;
    }
    (guest_count as f64 / f64::from(total_seats) * 100.0).min(100.0)
}

/// Compute the money figures of one tour.
///
/// Guests and expenses belonging to other tours are ignored, so callers may pass
/// whole collections.
pub fn compute_tour_financials(
    tour: &Tour,
    guests: &[Guest],
    expenses: &[Expense],
) -> TourFinancials {
    let (total_collected, total_unpaid) = guests
        .iter()
        .filter(|g| g.tour_id == tour.id)
        .fold((0, 0), |(collected, unpaid): (Cents, Cents), guest| {
            (
                collected.saturating_add(guest.paid_amount),
                unpaid.saturating_add(guest_due(tour.price_per_seat, guest)),
            )
        });

    let total_expenses = expenses
        .iter()
        .filter(|e| e.tour_id == tour.id)
        .fold(0, |total: Cents, e| total.saturating_add(e.amount));

    let projected_revenue = total_collected.saturating_add(total_unpaid);

    TourFinancials {
        total_collected,
        total_unpaid,
        projected_revenue,
        total_expenses,
        current_net_profit: total_collected.saturating_sub(total_expenses),
        projected_net_profit: projected_revenue.saturating_sub(total_expenses),
    }
}

/// Average amount collected per booked guest, rounded to the nearest cent.
/// Zero guests gives zero.
pub fn average_collection_per_guest(total_collected: Cents, guest_count: usize) -> Cents {
    match i64::try_from(guest_count) {
        Ok(count) if count > 0 => total_collected.saturating_add(count / 2).div_euclid(count),
        _ => 0,
    }
}

/// Totals for everything owned by `user_id`.
///
/// Ownership flows through tours: guests and expenses are selected by their
/// tour, never by the `user_id` they carry themselves.
pub fn compute_global_stats(
    user_id: &str,
    tours: &[Tour],
    guests: &[Guest],
    expenses: &[Expense],
) -> GlobalStats {
    let owned: Vec<&Tour> = tours.iter().filter(|t| t.is_owned_by(user_id)).collect();
    summarize(&owned, guests, expenses)
}

/// Totals for the tours whose date falls inside `range`.
pub fn compute_range_filtered_stats(
    tours: &[Tour],
    guests: &[Guest],
    expenses: &[Expense],
    range: DateRange,
) -> RangeStats {
    let selected: Vec<&Tour> = tours.iter().filter(|t| range.contains(t.tour_date)).collect();
    let stats = summarize(&selected, guests, expenses);

    RangeStats {
        stats,
        guest_count: stats.total_guests,
        tours: selected.into_iter().cloned().collect(),
    }
}

/// Per-tour income, expenses and profit, in the order the tours were given.
pub fn tour_breakdown(tours: &[Tour], guests: &[Guest], expenses: &[Expense]) -> Vec<TourLine> {
    tours
        .iter()
        .map(|tour| {
            let financials = compute_tour_financials(tour, guests, expenses);
            TourLine {
                tour_id: tour.id.clone(),
                tour_name: tour.tour_name.clone(),
                tour_date: tour.tour_date,
                host_name: tour.host_name.clone(),
                guest_count: guests.iter().filter(|g| g.tour_id == tour.id).count(),
                income: financials.total_collected,
                expenses: financials.total_expenses,
                profit: financials.current_net_profit,
            }
        })
        .collect()
}

/// Tours whose name or host contains `term`, ignoring case. An empty term matches all.
pub fn search_tours<'a>(tours: &'a [Tour], term: &str) -> Vec<&'a Tour> {
    tours.iter().filter(|t| t.matches(term)).collect()
}

fn summarize(tours: &[&Tour], guests: &[Guest], expenses: &[Expense]) -> GlobalStats {
    let tour_ids: HashSet<&str> = tours.iter().map(|t| t.id.as_str()).collect();

    let (total_guests, total_income) = guests
        .iter()
        .filter(|g| tour_ids.contains(g.tour_id.as_str()))
        .fold((0, 0), |(count, income): (usize, Cents), guest| {
            (count + 1, income.saturating_add(guest.paid_amount))
        });

    let total_expenses = expenses
        .iter()
        .filter(|e| tour_ids.contains(e.tour_id.as_str()))
        .fold(0, |total: Cents, e| total.saturating_add(e.amount));

    GlobalStats {
        total_tours: tours.len(),
        total_guests,
        total_income,
        total_expenses,
        net_profit: total_income.saturating_sub(total_expenses),
    }
}
