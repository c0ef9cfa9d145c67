use movie_booking::database::Database;
use movie_booking::services::bookings::{self, BookingError};
use movie_booking::services::catalog;
use movie_booking::services::users::{self, RegisteredUser};

/// Fresh seeded in-memory store. Every `sqlite::memory:` connection is its
/// own database, so the pool is capped at a single connection.
async fn seeded_db() -> Database {
    let db = Database::new("sqlite::memory:", 1)
        .await
        .expect("in-memory database should open");
    db.run_migrations().await.expect("migrations should apply");
    db.seed_if_empty().await.expect("seeding should succeed");
    db
}

fn labels(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

async fn register(db: &Database, name: &str, phone: &str) -> i64 {
    users::get_or_create_user(db, name, phone)
        .await
        .expect("registration should succeed")
        .id()
}

/// All seeded show ids, gathered through the public catalog API.
async fn all_show_ids(db: &Database) -> Vec<i64> {
    let mut ids = Vec::new();
    for movie in catalog::list_movies(db).await.expect("movies should load") {
        for show in catalog::shows_for_movie(db, movie.id)
            .await
            .expect("shows should load")
        {
            ids.push(show.id);
        }
    }
    ids
}

/// The seeded show priced at 220 (Screen 1, 18:00).
async fn show_priced_220(db: &Database) -> i64 {
    for id in all_show_ids(db).await {
        let show = catalog::get_show(db, id)
            .await
            .expect("show should load")
            .expect("seeded show should exist");
        if show.price == 220 {
            return id;
        }
    }
    panic!("seed should contain a show priced at 220");
}

#[tokio::test]
async fn seeding_creates_a_full_unbooked_seat_map_per_show() {
    let db = seeded_db().await;

    let mut expected = Vec::new();
    for row in ['A', 'B'] {
        for number in 1..=10 {
            expected.push(format!("{row}{number}"));
        }
    }

    let show_ids = all_show_ids(&db).await;
    assert_eq!(show_ids.len(), 4);
    for show_id in show_ids {
        let map = catalog::seat_map(&db, show_id)
            .await
            .expect("seat map should load");
        assert_eq!(map.len(), 20);
        assert!(map.iter().all(|seat| !seat.is_booked));
        let got: Vec<String> = map.iter().map(|seat| seat.seat_label.clone()).collect();
        // also pins numeric-aware ordering: A2 comes before A10
        assert_eq!(got, expected);
    }
}

#[tokio::test]
async fn reseeding_a_populated_store_changes_nothing() {
    let db = seeded_db().await;
    db.seed_if_empty().await.expect("reseed should be a no-op");

    let movies = catalog::list_movies(&db).await.expect("movies should load");
    assert_eq!(movies.len(), 3);
    assert_eq!(all_show_ids(&db).await.len(), 4);
}

#[tokio::test]
async fn movies_are_listed_by_title() {
    let db = seeded_db().await;
    let titles: Vec<String> = catalog::list_movies(&db)
        .await
        .expect("movies should load")
        .into_iter()
        .map(|movie| movie.title)
        .collect();
    assert_eq!(
        titles,
        vec!["Laugh Out Loud", "Starlight Odyssey", "The Last Mission"]
    );
}

#[tokio::test]
async fn shows_are_listed_by_time_and_unknown_movies_are_empty() {
    let db = seeded_db().await;
    let starlight = catalog::list_movies(&db)
        .await
        .expect("movies should load")
        .into_iter()
        .find(|movie| movie.title == "Starlight Odyssey")
        .expect("seeded movie should exist");

    let shows = catalog::shows_for_movie(&db, starlight.id)
        .await
        .expect("shows should load");
    assert_eq!(shows.len(), 2);
    assert!(shows[0].show_time < shows[1].show_time);

    let none = catalog::shows_for_movie(&db, 9999)
        .await
        .expect("unknown movie should not error");
    assert!(none.is_empty());
}

#[tokio::test]
async fn get_show_joins_the_movie_title() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let show = catalog::get_show(&db, show_id)
        .await
        .expect("show should load")
        .expect("seeded show should exist");
    assert_eq!(show.title, "Starlight Odyssey");
    assert_eq!(show.screen, "Screen 1");

    let missing = catalog::get_show(&db, 9999)
        .await
        .expect("unknown show should not error");
    assert!(missing.is_none());
}

#[tokio::test]
async fn same_phone_resolves_to_the_same_user() {
    let db = seeded_db().await;

    let first = users::get_or_create_user(&db, "Alice", "555-0001")
        .await
        .expect("registration should succeed");
    assert!(matches!(&first, RegisteredUser::Created(_)));

    let second = users::get_or_create_user(&db, "Someone Else", "555-0001")
        .await
        .expect("re-registration should succeed");
    let RegisteredUser::Existing(user) = second else {
        panic!("same phone should resolve to the existing account");
    };
    assert_eq!(user.id, first.id());
    // the stored name wins
    assert_eq!(user.name, "Alice");
}

#[tokio::test]
async fn booking_a_taken_seat_conflicts_and_changes_nothing() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let alice = register(&db, "Alice", "555-0001").await;
    let bob = register(&db, "Bob", "555-0002").await;

    bookings::reserve(&db, alice, show_id, &labels(&["A1"]))
        .await
        .expect("first booking should succeed");

    let err = bookings::reserve(&db, bob, show_id, &labels(&["A1"]))
        .await
        .expect_err("second booking of the same seat should fail");
    assert!(matches!(err, BookingError::SeatTaken(ref label) if label == "A1"));

    let map = catalog::seat_map(&db, show_id)
        .await
        .expect("seat map should load");
    let booked: Vec<&str> = map
        .iter()
        .filter(|seat| seat.is_booked)
        .map(|seat| seat.seat_label.as_str())
        .collect();
    assert_eq!(booked, vec!["A1"]);

    let bob_bookings = bookings::bookings_for_phone(&db, "555-0002")
        .await
        .expect("lookup should succeed");
    assert!(bob_bookings.is_empty());
}

#[tokio::test]
async fn a_duplicate_label_in_one_request_fails_the_whole_batch() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let user = register(&db, "Alice", "555-0001").await;

    let err = bookings::reserve(&db, user, show_id, &labels(&["A1", "A1", "A2"]))
        .await
        .expect_err("duplicate label should fail");
    assert!(matches!(err, BookingError::SeatTaken(ref label) if label == "A1"));

    let map = catalog::seat_map(&db, show_id)
        .await
        .expect("seat map should load");
    assert!(map.iter().all(|seat| !seat.is_booked));
    assert!(bookings::bookings_for_phone(&db, "555-0001")
        .await
        .expect("lookup should succeed")
        .is_empty());
}

#[tokio::test]
async fn an_unknown_seat_aborts_the_whole_batch() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let user = register(&db, "Alice", "555-0001").await;

    let err = bookings::reserve(&db, user, show_id, &labels(&["A1", "Z9"]))
        .await
        .expect_err("unknown seat should fail");
    assert!(matches!(err, BookingError::SeatNotFound(ref label) if label == "Z9"));

    let map = catalog::seat_map(&db, show_id)
        .await
        .expect("seat map should load");
    assert!(map.iter().all(|seat| !seat.is_booked));
}

#[tokio::test]
async fn booking_an_unknown_show_fails_before_touching_seats() {
    let db = seeded_db().await;
    let user = register(&db, "Alice", "555-0001").await;

    let err = bookings::reserve(&db, user, 9999, &labels(&["A1"]))
        .await
        .expect_err("unknown show should fail");
    assert!(matches!(err, BookingError::ShowNotFound(9999)));
}

#[tokio::test]
async fn an_empty_seat_list_is_rejected() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let user = register(&db, "Alice", "555-0001").await;

    let err = bookings::reserve(&db, user, show_id, &labels(&["  ", ""]))
        .await
        .expect_err("blank labels should fail");
    assert!(matches!(err, BookingError::EmptySeatList));
}

#[tokio::test]
async fn labels_are_trimmed_and_uppercased() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let user = register(&db, "Alice", "555-0001").await;

    let ids = bookings::reserve(&db, user, show_id, &labels(&[" a1 ", "b2"]))
        .await
        .expect("normalized labels should book");
    assert_eq!(ids.len(), 2);

    let summaries = bookings::bookings_for_phone(&db, "555-0001")
        .await
        .expect("lookup should succeed");
    let mut seats: Vec<&str> = summaries
        .iter()
        .map(|booking| booking.seat_label.as_str())
        .collect();
    seats.sort_unstable();
    assert_eq!(seats, vec!["A1", "B2"]);
}

#[tokio::test]
async fn a_batch_charges_the_show_price_per_seat_at_one_instant() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let user = register(&db, "Alice", "555-0001").await;

    let ids = bookings::reserve(&db, user, show_id, &labels(&["A1", "A2"]))
        .await
        .expect("booking should succeed");
    assert_eq!(ids.len(), 2);

    let summaries = bookings::bookings_for_phone(&db, "555-0001")
        .await
        .expect("lookup should succeed");
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|booking| booking.amount_paid == 220));
    let total: i64 = summaries.iter().map(|booking| booking.amount_paid).sum();
    assert_eq!(total, 440);
    // the whole batch shares one timestamp
    assert_eq!(summaries[0].booked_at, summaries[1].booked_at);
}

#[tokio::test]
async fn bookings_are_listed_most_recent_first() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let user = register(&db, "Alice", "555-0001").await;

    bookings::reserve(&db, user, show_id, &labels(&["A1"]))
        .await
        .expect("first booking should succeed");
    let second = bookings::reserve(&db, user, show_id, &labels(&["B1"]))
        .await
        .expect("second booking should succeed");

    let summaries = bookings::bookings_for_phone(&db, "555-0001")
        .await
        .expect("lookup should succeed");
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, second[0]);
}

#[tokio::test]
async fn cancelling_an_unknown_booking_returns_false() {
    let db = seeded_db().await;
    let cancelled = bookings::cancel(&db, 12345)
        .await
        .expect("cancel of a missing booking should not error");
    assert!(!cancelled);
}

#[tokio::test]
async fn reserve_then_cancel_round_trips() {
    let db = seeded_db().await;
    let show_id = show_priced_220(&db).await;
    let user = register(&db, "Alice", "555-0001").await;

    let ids = bookings::reserve(&db, user, show_id, &labels(&["A1"]))
        .await
        .expect("booking should succeed");

    let booked_a1 = |map: &[movie_booking::models::SeatStatus]| {
        map.iter()
            .any(|seat| seat.seat_label == "A1" && seat.is_booked)
    };
    let map = catalog::seat_map(&db, show_id)
        .await
        .expect("seat map should load");
    assert!(booked_a1(&map));

    let cancelled = bookings::cancel(&db, ids[0])
        .await
        .expect("cancel should succeed");
    assert!(cancelled);

    let map = catalog::seat_map(&db, show_id)
        .await
        .expect("seat map should load");
    assert!(!booked_a1(&map));
    assert!(bookings::bookings_for_phone(&db, "555-0001")
        .await
        .expect("lookup should succeed")
        .is_empty());
}

#[tokio::test]
async fn an_unknown_phone_has_no_bookings() {
    let db = seeded_db().await;
    let summaries = bookings::bookings_for_phone(&db, "no-such-phone")
        .await
        .expect("lookup should succeed");
    assert!(summaries.is_empty());
}
