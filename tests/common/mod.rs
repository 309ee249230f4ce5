// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;
use tourledger::application::AgencyService;
use tourledger::domain::{NewTour, Tour, User};

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(AgencyService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = AgencyService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: a registered agency owner, logged in
pub async fn register_owner(service: &AgencyService) -> Result<User> {
    let user = service
        .register_user("Rahim".into(), "rahim@example.com".into(), None)
        .await?;
    Ok(user)
}

/// Test fixture: a tour with the given seat price, default seat count
pub async fn create_tour(
    service: &AgencyService,
    user: &User,
    name: &str,
    date: &str,
    price: i64,
) -> Result<Tour> {
    let tour = service
        .create_tour(&user.id, NewTour::new(name, parse_date(date), price))
        .await?;
    Ok(tour)
}
