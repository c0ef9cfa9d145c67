use crate::database::Database;
use crate::models::{Movie, SeatStatus, Show, ShowDetails};

pub async fn list_movies(db: &Database) -> Result<Vec<Movie>, sqlx::Error> {
    sqlx::query_as::<_, Movie>(
        "SELECT id, title, rating, duration_mins FROM movies ORDER BY title",
    )
    .fetch_all(&db.pool)
    .await
}

/// Shows of one movie, earliest first. An unknown movie id simply yields
/// nothing.
pub async fn shows_for_movie(db: &Database, movie_id: i64) -> Result<Vec<Show>, sqlx::Error> {
    sqlx::query_as::<_, Show>(
        r#"
        SELECT id, movie_id, show_time, screen, price
        FROM shows
        WHERE movie_id = ?
        ORDER BY show_time
        "#,
    )
    .bind(movie_id)
    .fetch_all(&db.pool)
    .await
}

pub async fn get_show(db: &Database, show_id: i64) -> Result<Option<ShowDetails>, sqlx::Error> {
    sqlx::query_as::<_, ShowDetails>(
        r#"
        SELECT s.id, s.movie_id, s.show_time, s.screen, s.price, m.title
        FROM shows s
        JOIN movies m ON m.id = s.movie_id
        WHERE s.id = ?
        "#,
    )
    .bind(show_id)
    .fetch_optional(&db.pool)
    .await
}

/// Seat availability for one show, row A before row B and columns in
/// numeric order (A2 before A10).
pub async fn seat_map(db: &Database, show_id: i64) -> Result<Vec<SeatStatus>, sqlx::Error> {
    sqlx::query_as::<_, SeatStatus>(
        r#"
        SELECT seat_label, is_booked
        FROM seats
        WHERE show_id = ?
        ORDER BY substr(seat_label, 1, 1), CAST(substr(seat_label, 2) AS INTEGER)
        "#,
    )
    .bind(show_id)
    .fetch_all(&db.pool)
    .await
}
