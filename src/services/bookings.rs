use chrono::{Timelike, Utc};
use thiserror::Error;
use tracing::debug;

use crate::database::Database;
use crate::models::BookingSummary;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("show {0} not found")]
    ShowNotFound(i64),
    #[error("seat {0} does not exist for this show")]
    SeatNotFound(String),
    #[error("seat {0} is already booked")]
    SeatTaken(String),
    #[error("no seat labels provided")]
    EmptySeatList,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Trims, uppercases and drops empty entries, preserving order.
pub(crate) fn normalize_labels(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|label| label.trim().to_uppercase())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Books every requested seat of one show for the user, all or nothing.
///
/// The whole request runs in a single transaction: the first label that is
/// missing or already taken aborts the batch, and dropping the uncommitted
/// transaction rolls back any seat marked earlier in the same call. A label
/// repeated within one request therefore fails too, with the taken-seat
/// error: the second occurrence sees the mark written by the first.
///
/// Returns the new booking ids in input order; the whole batch shares one
/// booked_at instant.
pub async fn reserve(
    db: &Database,
    user_id: i64,
    show_id: i64,
    seat_labels: &[String],
) -> Result<Vec<i64>, BookingError> {
    let labels = normalize_labels(seat_labels);
    if labels.is_empty() {
        return Err(BookingError::EmptySeatList);
    }

    let mut tx = db.pool.begin().await?;

    let price: i64 = sqlx::query_scalar("SELECT price FROM shows WHERE id = ?")
        .bind(show_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingError::ShowNotFound(show_id))?;

    let now = Utc::now().naive_utc();
    let booked_at = now.with_nanosecond(0).unwrap_or(now);

    let mut booking_ids = Vec::with_capacity(labels.len());
    for label in &labels {
        let seat: Option<(i64, bool)> =
            sqlx::query_as("SELECT id, is_booked FROM seats WHERE show_id = ? AND seat_label = ?")
                .bind(show_id)
                .bind(label.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        let (seat_id, is_booked) = seat.ok_or_else(|| BookingError::SeatNotFound(label.clone()))?;
        if is_booked {
            return Err(BookingError::SeatTaken(label.clone()));
        }

        sqlx::query("UPDATE seats SET is_booked = 1 WHERE id = ?")
            .bind(seat_id)
            .execute(&mut *tx)
            .await?;

        let booking_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (user_id, show_id, seat_label, booked_at, amount_paid)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(show_id)
        .bind(label.as_str())
        .bind(booked_at)
        .bind(price)
        .fetch_one(&mut *tx)
        .await?;
        booking_ids.push(booking_id);
    }

    tx.commit().await?;
    debug!(
        "Booked {} seats on show {} for user {}",
        booking_ids.len(),
        show_id,
        user_id
    );
    Ok(booking_ids)
}

/// Every booking made under this phone, most recent first. An unknown phone
/// yields an empty list.
pub async fn bookings_for_phone(
    db: &Database,
    phone: &str,
) -> Result<Vec<BookingSummary>, BookingError> {
    let summaries = sqlx::query_as::<_, BookingSummary>(
        r#"
        SELECT b.id, m.title, s.show_time, s.screen, b.seat_label, b.amount_paid, b.booked_at
        FROM bookings b
        JOIN shows s ON s.id = b.show_id
        JOIN movies m ON m.id = s.movie_id
        JOIN users u ON u.id = b.user_id
        WHERE u.phone = ?
        ORDER BY b.booked_at DESC, b.id DESC
        "#,
    )
    .bind(phone.trim())
    .fetch_all(&db.pool)
    .await?;
    Ok(summaries)
}

/// Deletes a booking and releases its seat in one transaction. Returns
/// false when the booking id is unknown; nothing to cancel is a normal
/// outcome, not an error.
pub async fn cancel(db: &Database, booking_id: i64) -> Result<bool, BookingError> {
    let mut tx = db.pool.begin().await?;

    let booking: Option<(i64, String)> =
        sqlx::query_as("SELECT show_id, seat_label FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((show_id, seat_label)) = booking else {
        return Ok(false);
    };

    sqlx::query("DELETE FROM bookings WHERE id = ?")
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE seats SET is_booked = 0 WHERE show_id = ? AND seat_label = ?")
        .bind(show_id)
        .bind(seat_label)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    debug!("Cancelled booking {}", booking_id);
    Ok(true)
}
