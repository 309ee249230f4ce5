mod common;

use anyhow::Result;
use common::{create_tour, parse_date, register_owner, test_service};
use tourledger::application::{AgencyService, FALLBACK_INSIGHT, LocalInsight};
use tourledger::domain::{DateRange, ExpenseCategory, NewGuest, PaymentStatus};

#[tokio::test]
async fn test_tour_summary_figures() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = register_owner(&service).await?;
    let tour = create_tour(&service, &user, "Sajek", "2024-03-05", 1000).await?;

    service
        .add_guest(&user.id, &tour.id, NewGuest::new("Partial", 400))
        .await?;
    // Overpaid guest owes nothing; the extra still counts as collected
    service
        .add_guest(
            &user.id,
            &tour.id,
            NewGuest::new("Generous", 1200).with_status(PaymentStatus::Paid),
        )
        .await?;
    service
        .add_expense(&user.id, &tour.id, ExpenseCategory::Transport, 500, None)
        .await?;

    let summary = service.tour_summary(&user.id, &tour.id).await?;
    let f = summary.financials;

    assert_eq!(f.total_collected, 1600);
    assert_eq!(f.total_unpaid, 600);
    assert_eq!(f.projected_revenue, 2200);
    assert_eq!(f.total_expenses, 500);
    assert_eq!(f.current_net_profit, 1100);
    assert_eq!(f.projected_net_profit, 1700);
    assert_eq!(summary.average_collection, 800);
    assert_eq!(summary.guest_count, 2);
    assert!((summary.seat_occupancy - 10.0).abs() < f64::EPSILON);

    let outstanding: Vec<_> = summary.outstanding().collect();
    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].guest_name, "Partial");
    assert!((outstanding[0].paid_percentage - 40.0).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
async fn test_range_report_filters_by_tour_date() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let user = register_owner(&service).await?;
    let jan = create_tour(&service, &user, "January", "2024-01-10", 1000).await?;
    let mar = create_tour(&service, &user, "March", "2024-03-05", 1000).await?;

    service
        .add_guest(&user.id, &jan.id, NewGuest::new("A", 1000))
        .await?;
    service
        .add_guest(&user.id, &mar.id, NewGuest::new("B", 600))
        .await?;
    service
        .add_guest(&user.id, &mar.id, NewGuest::new("C", 400))
        .await?;
    service
        .add_expense(&user.id, &jan.id, ExpenseCategory::Hotel, 300, None)
        .await?;
    service
        .add_expense(&user.id, &mar.id, ExpenseCategory::Guide, 250, None)
        .await?;

    let range = DateRange::new(Some(parse_date("2024-02-01")), None);
    let report = service.range_report(&user.id, range).await?;

    assert_eq!(report.stats.tours.len(), 1);
    assert_eq!(report.stats.tours[0].id, mar.id);
    assert_eq!(report.stats.guest_count, 2);
    assert_eq!(report.stats.stats.total_income, 1000);
    assert_eq!(report.stats.stats.total_expenses, 250);
    assert_eq!(report.stats.stats.net_profit, 750);
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].profit, 750);

    let all = service
        .range_report(&user.id, DateRange::unbounded())
        .await?;
    assert_eq!(all.stats.stats.total_tours, 2);
    assert_eq!(all.stats.stats.total_income, 2000);

    // Bounds are inclusive
    let day = service
        .range_report(&user.id, DateRange::on(parse_date("2024-01-10")))
        .await?;
    assert_eq!(day.lines.len(), 1);
    assert_eq!(day.lines[0].tour_id, jan.id);

    Ok(())
}

#[tokio::test]
async fn test_range_report_json_shape() -> Result<()> {
    let service = AgencyService::in_memory();
    let user = register_owner(&service).await?;
    create_tour(&service, &user, "March", "2024-03-05", 1000).await?;

    let report = service
        .range_report(&user.id, DateRange::unbounded())
        .await?;
    let value = serde_json::to_value(&report)?;

    assert_eq!(value["total_tours"], 1);
    assert_eq!(value["guest_count"], 0);
    assert!(value["tours"].is_array());
    assert!(value["lines"].is_array());

    Ok(())
}

#[tokio::test]
async fn test_global_stats_empty_user() -> Result<()> {
    let service = AgencyService::in_memory();
    let user = register_owner(&service).await?;

    let stats = service.global_stats(&user.id).await?;

    assert_eq!(stats.total_tours, 0);
    assert_eq!(stats.total_guests, 0);
    assert_eq!(stats.net_profit, 0);

    Ok(())
}

#[tokio::test]
async fn test_dashboard_insight() -> Result<()> {
    let service = AgencyService::in_memory();
    let user = register_owner(&service).await?;
    let tour = create_tour(&service, &user, "Sajek", "2024-03-05", 1000).await?;
    service
        .add_guest(&user.id, &tour.id, NewGuest::new("A", 1000))
        .await?;

    let plain = service.dashboard(&user.id, None).await?;
    assert_eq!(plain.insight, FALLBACK_INSIGHT);
    assert_eq!(plain.stats.total_income, 1000);

    let local = service.dashboard(&user.id, Some(&LocalInsight)).await?;
    assert!(local.insight.contains("in profit"));
    assert_eq!(local.stats, plain.stats);

    Ok(())
}
