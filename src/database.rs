use anyhow::Context;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Sqlite>,
}

const SEED_MOVIES: &[(&str, &str, i64)] = &[
    ("Starlight Odyssey", "U/A", 128),
    ("The Last Mission", "U/A", 142),
    ("Laugh Out Loud", "U", 110),
];

// (movie index in SEED_MOVIES, show time, screen, price)
const SEED_SHOWS: &[(usize, &str, &str, i64)] = &[
    (0, "2025-08-29T18:00:00", "Screen 1", 220),
    (0, "2025-08-29T21:15:00", "Screen 1", 250),
    (1, "2025-08-29T19:30:00", "Screen 2", 240),
    (2, "2025-08-29T17:00:00", "Screen 3", 200),
];

const SEAT_ROWS: &[char] = &['A', 'B'];
const SEATS_PER_ROW: u32 = 10;

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        // ON DELETE CASCADE only fires with the foreign_keys pragma on, and
        // SQLite scopes the pragma to a connection, so it is part of the
        // connect options rather than a one-off statement.
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("./src/migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed");
        Ok(())
    }

    /// Seeds the fixed catalog on first run: 3 movies, 4 shows, 20 unbooked
    /// seats per show. A store that already has movies is left untouched.
    /// Each phase commits on its own so shows never outrun their movies and
    /// seats never outrun their shows.
    pub async fn seed_if_empty(&self) -> anyhow::Result<()> {
        let movie_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        if movie_count > 0 {
            return Ok(());
        }

        info!("Empty catalog, seeding movies, shows and seats");

        let mut tx = self.pool.begin().await?;
        let mut movie_ids = Vec::with_capacity(SEED_MOVIES.len());
        for (title, rating, duration_mins) in SEED_MOVIES {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO movies (title, rating, duration_mins) VALUES (?, ?, ?) RETURNING id",
            )
            .bind(title)
            .bind(rating)
            .bind(duration_mins)
            .fetch_one(&mut *tx)
            .await?;
            movie_ids.push(id);
        }
        tx.commit().await?;

        let mut tx = self.pool.begin().await?;
        let mut show_ids = Vec::with_capacity(SEED_SHOWS.len());
        for (movie_idx, show_time, screen, price) in SEED_SHOWS {
            let show_time = NaiveDateTime::parse_from_str(show_time, "%Y-%m-%dT%H:%M:%S")
                .with_context(|| format!("invalid seed show time {show_time}"))?;
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO shows (movie_id, show_time, screen, price) VALUES (?, ?, ?, ?) RETURNING id",
            )
            .bind(movie_ids[*movie_idx])
            .bind(show_time)
            .bind(screen)
            .bind(price)
            .fetch_one(&mut *tx)
            .await?;
            show_ids.push(id);
        }
        tx.commit().await?;

        let mut tx = self.pool.begin().await?;
        for &show_id in &show_ids {
            for row in SEAT_ROWS {
                for number in 1..=SEATS_PER_ROW {
                    sqlx::query("INSERT INTO seats (show_id, seat_label, is_booked) VALUES (?, ?, 0)")
                        .bind(show_id)
                        .bind(format!("{row}{number}"))
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }
        tx.commit().await?;

        info!(
            "Seeded {} movies, {} shows, {} seats",
            movie_ids.len(),
            show_ids.len(),
            show_ids.len() * SEAT_ROWS.len() * SEATS_PER_ROW as usize
        );
        Ok(())
    }
}
