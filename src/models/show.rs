use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub movie_id: i64,
    pub show_time: NaiveDateTime,
    pub screen: String,
    pub price: i64,
}

/// A show joined with the title of the movie it screens.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShowDetails {
    pub id: i64,
    pub movie_id: i64,
    pub show_time: NaiveDateTime,
    pub screen: String,
    pub price: i64,
    pub title: String,
}
