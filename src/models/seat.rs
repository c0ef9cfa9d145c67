use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One entry of a show's seat map.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SeatStatus {
    pub seat_label: String,
    pub is_booked: bool,
}
