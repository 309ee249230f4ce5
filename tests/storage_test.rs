mod common;

use anyhow::Result;
use common::{create_tour, register_owner};
use tempfile::TempDir;
use tourledger::application::{AgencyService, AppError};
use tourledger::domain::NewGuest;
use tourledger::storage::{BlobStore, DATA_STORE_KEY, MemoryBlobStore, SESSION_KEY};

const LEGACY_DOCUMENT: &str = r#"{
    "users": [{"id": "1718000000000", "name": "Rahim", "email": "rahim@example.com",
               "role": "admin", "createdAt": "2024-06-10T08:00:00.000Z"}],
    "tours": [{"id": "tour_1", "userId": "1718000000000", "tourName": "Sajek",
               "tourDate": "2024-03-05", "hostName": "Karim", "totalSeats": 20,
               "pricePerSeat": "1500", "createdAt": "2024-01-01T00:00:00.000Z"}],
    "guests": [
        {"id": "guest_1", "tourId": "tour_1", "userId": "1718000000000",
         "guestName": "Ayesha", "mobileNumber": "", "seatNumber": "1",
         "paidAmount": "1000.50", "paymentStatus": "Partial",
         "createdAt": "2024-01-02T00:00:00.000Z"},
        {"id": "guest_2", "tourId": "tour_1", "userId": "1718000000000",
         "guestName": "Nila", "paidAmount": "abc",
         "createdAt": "2024-01-02T00:00:00.000Z"}
    ],
    "expenses": [{"id": "exp_1", "tourId": "tour_1", "userId": "1718000000000",
                  "category": "Transport", "amount": null,
                  "createdAt": "2024-01-03T00:00:00.000Z"}]
}"#;

#[tokio::test]
async fn test_loads_document_written_by_older_client() -> Result<()> {
    let service = AgencyService::new(MemoryBlobStore::with_blob(
        DATA_STORE_KEY,
        LEGACY_DOCUMENT,
    ));

    let user = service.login("rahim@example.com").await?;
    let summary = service.tour_summary(&user.id, "tour_1").await?;

    assert_eq!(summary.tour.price_per_seat, 150000);
    assert_eq!(summary.guest_count, 2);
    // "abc" is sanitized to zero, null expense amount likewise
    assert_eq!(summary.financials.total_collected, 100050);
    assert_eq!(summary.financials.total_expenses, 0);
    assert_eq!(summary.financials.total_unpaid, 49950 + 150000);

    Ok(())
}

#[tokio::test]
async fn test_loose_seat_counts_do_not_break_the_document() -> Result<()> {
    let document = r#"{
        "users": [{"id": "u1", "name": "Rahim", "email": "rahim@example.com",
                   "role": "admin", "createdAt": "2024-06-10T08:00:00.000Z"}],
        "tours": [
            {"id": "tour_text", "userId": "u1", "tourName": "Sajek", "tourDate": "2024-03-05",
             "totalSeats": "20", "pricePerSeat": 1000, "createdAt": "2024-01-01T00:00:00.000Z"},
            {"id": "tour_null", "userId": "u1", "tourName": "Bandarban", "tourDate": "2024-04-05",
             "totalSeats": null, "pricePerSeat": 1000, "createdAt": "2024-01-01T00:00:00.000Z"}
        ]
    }"#;
    let service = AgencyService::new(MemoryBlobStore::with_blob(DATA_STORE_KEY, document));

    let user = service.login("rahim@example.com").await?;
    let tours = service.list_tours(&user.id).await?;

    assert_eq!(tours.len(), 2);
    assert_eq!(tours[0].total_seats, 20);
    assert_eq!(tours[1].total_seats, 0);

    let summary = service.tour_summary(&user.id, "tour_null").await?;
    assert_eq!(summary.seat_occupancy, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_corrupt_document_is_reported() -> Result<()> {
    let service = AgencyService::new(MemoryBlobStore::with_blob(DATA_STORE_KEY, "{not json"));

    let result = service.login("rahim@example.com").await;
    assert!(matches!(result, Err(AppError::CorruptStore(_))));

    Ok(())
}

#[tokio::test]
async fn test_missing_document_starts_empty() -> Result<()> {
    let service = AgencyService::in_memory();

    assert!(service.current_user().await?.is_none());
    assert!(service.list_tours("anyone").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_data_survives_reconnect() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("agency.db");
    let db_path = db_path.to_str().unwrap();

    let tour_id = {
        let service = AgencyService::init(db_path).await?;
        let user = register_owner(&service).await?;
        let tour = create_tour(&service, &user, "Sajek", "2024-03-05", 1000).await?;
        service
            .add_guest(&user.id, &tour.id, NewGuest::new("A", 250))
            .await?;
        tour.id
    };

    let service = AgencyService::connect(db_path).await?;
    let user = service.require_user().await?;
    assert_eq!(user.email, "rahim@example.com");

    let guests = service.list_guests(&user.id, &tour_id).await?;
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0].paid_amount, 250);

    Ok(())
}

#[tokio::test]
async fn test_connect_requires_existing_database() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("missing.db");

    let result = AgencyService::connect(db_path.to_str().unwrap()).await;
    assert!(matches!(result, Err(AppError::Storage(_))));

    Ok(())
}

#[tokio::test]
async fn test_session_key_is_plain_email() -> Result<()> {
    let store = MemoryBlobStore::new();
    store.save(SESSION_KEY, "rahim@example.com").await?;

    assert_eq!(
        store.load(SESSION_KEY).await?.as_deref(),
        Some("rahim@example.com")
    );
    store.remove(SESSION_KEY).await?;
    store.remove(SESSION_KEY).await?;
    assert!(store.load(SESSION_KEY).await?.is_none());

    Ok(())
}
