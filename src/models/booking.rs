use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One booking as shown to the user: the booking row joined with the show
/// and movie it belongs to.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingSummary {
    pub id: i64,
    pub title: String,
    pub show_time: NaiveDateTime,
    pub screen: String,
    pub seat_label: String,
    pub amount_paid: i64,
    pub booked_at: NaiveDateTime,
}
