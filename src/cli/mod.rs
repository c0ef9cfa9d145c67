use std::io::{self, Write};

use anyhow::Result;
use tracing::error;

use crate::database::Database;
use crate::models::ShowDetails;
use crate::services::bookings::{self, BookingError};
use crate::services::users::{self, RegisteredUser};
use crate::services::catalog;
use crate::AppState;

const MENU: &str = "\n================= Movie Ticket Booking — Main Menu =================\n\
                    1) List Movies\n\
                    2) List Shows for a Movie\n\
                    3) View Seat Map for a Show\n\
                    4) Book Seats\n\
                    5) View My Bookings\n\
                    6) Cancel a Booking\n\
                    0) Exit\n\
                    -------------------------------------------------------------------";

/// Runs the interactive menu until the user exits or stdin closes. Service
/// failures are printed and the loop keeps going; only terminal I/O errors
/// bubble up.
pub async fn run(state: &AppState) -> Result<()> {
    loop {
        println!("{MENU}");
        let Some(choice) = prompt("Choose: ")? else {
            println!("\nGoodbye!");
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                list_movies(&state.db).await;
                pause()?;
            }
            "2" => {
                list_shows(&state.db).await?;
                pause()?;
            }
            "3" => {
                view_seat_map(&state.db).await?;
                pause()?;
            }
            "4" => {
                book_seats(&state.db).await?;
                pause()?;
            }
            "5" => {
                view_bookings(&state.db).await?;
                pause()?;
            }
            "6" => {
                cancel_booking(&state.db).await?;
                pause()?;
            }
            "0" => {
                println!("Bye! Welcome again!");
                return Ok(());
            }
            _ => println!("Invalid option. Try again."),
        }
    }
}

/* ---------- prompt helpers ---------- */

/// Prints the message and reads one trimmed line. None means stdin closed.
fn prompt(message: &str) -> Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Like prompt, but expects an integer id. Bad input is reported and
/// treated like a declined prompt so the caller falls back to the menu.
fn prompt_id(message: &str) -> Result<Option<i64>> {
    let Some(text) = prompt(message)? else {
        return Ok(None);
    };
    match text.parse::<i64>() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            println!("Invalid number.");
            Ok(None)
        }
    }
}

fn pause() -> Result<()> {
    print!("\nPress Enter to continue...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}

fn print_heading(title: &str) {
    println!("\n{}", "=".repeat(70));
    println!("{title}");
    println!("{}", "=".repeat(70));
}

/* ---------- menu actions ---------- */

async fn list_movies(db: &Database) {
    print_heading("Movies");
    match catalog::list_movies(db).await {
        Ok(movies) if movies.is_empty() => println!("No movies found."),
        Ok(movies) => {
            for movie in &movies {
                println!(
                    "[{}] {}  ({}, {} mins)",
                    movie.id, movie.title, movie.rating, movie.duration_mins
                );
            }
        }
        Err(e) => {
            error!("Failed to list movies: {:?}", e);
            println!("Could not load movies.");
        }
    }
}

async fn list_shows(db: &Database) -> Result<()> {
    list_movies(db).await;
    let Some(movie_id) = prompt_id("\nEnter Movie ID to view shows: ")? else {
        return Ok(());
    };
    match catalog::shows_for_movie(db, movie_id).await {
        Ok(shows) => {
            print_heading("Shows");
            if shows.is_empty() {
                println!("No shows for this movie.");
            }
            for show in &shows {
                println!(
                    "[Show {}] {} • {} • ₹{}",
                    show.id, show.show_time, show.screen, show.price
                );
            }
        }
        Err(e) => {
            error!("Failed to list shows for movie {}: {:?}", movie_id, e);
            println!("Could not load shows.");
        }
    }
    Ok(())
}

async fn view_seat_map(db: &Database) -> Result<()> {
    let Some(show_id) = prompt_id("Enter Show ID to view seats: ")? else {
        return Ok(());
    };
    match catalog::get_show(db, show_id).await {
        Ok(Some(show)) => print_seat_grid(db, &show).await,
        Ok(None) => println!("Show not found."),
        Err(e) => {
            error!("Failed to load show {}: {:?}", show_id, e);
            println!("Could not load the show.");
        }
    }
    Ok(())
}

/// Renders the seat map as one line per row letter, booked seats marked (X).
async fn print_seat_grid(db: &Database, show: &ShowDetails) {
    print_heading(&format!(
        "Seat Map — {} @ {} • {}",
        show.title, show.show_time, show.screen
    ));
    let seats = match catalog::seat_map(db, show.id).await {
        Ok(seats) => seats,
        Err(e) => {
            error!("Failed to load seat map for show {}: {:?}", show.id, e);
            println!("Could not load the seat map.");
            return;
        }
    };

    let mut current_row = None;
    let mut line: Vec<String> = Vec::new();
    for seat in &seats {
        let row_letter = seat.seat_label.chars().next();
        if current_row != row_letter {
            if !line.is_empty() {
                println!("{}", line.join(" "));
                line.clear();
            }
            current_row = row_letter;
        }
        let mark = if seat.is_booked { "(X)" } else { "( )" };
        line.push(format!("{}{}", seat.seat_label, mark));
    }
    if !line.is_empty() {
        println!("{}", line.join(" "));
    }
}

async fn book_seats(db: &Database) -> Result<()> {
    let Some(show_id) = prompt_id("Enter Show ID to book: ")? else {
        return Ok(());
    };
    let show = match catalog::get_show(db, show_id).await {
        Ok(Some(show)) => show,
        Ok(None) => {
            println!("Show not found.");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to load show {}: {:?}", show_id, e);
            println!("Could not load the show.");
            return Ok(());
        }
    };

    let Some(name) = prompt("Your Name: ")? else {
        return Ok(());
    };
    let Some(phone) = prompt("Your Phone (unique): ")? else {
        return Ok(());
    };
    let user = match users::get_or_create_user(db, &name, &phone).await {
        Ok(RegisteredUser::Existing(user)) => {
            println!("Welcome back, {}!", user.name);
            user
        }
        Ok(RegisteredUser::Created(user)) => user,
        Err(e) => {
            error!("Failed to register user: {:?}", e);
            println!("Could not register you.");
            return Ok(());
        }
    };

    println!("Enter seats separated by commas (e.g., A1,A2,B5). Type 'map' to view seats, 'back' to abort.");
    loop {
        let Some(seat_input) = prompt("Seats: ")? else {
            return Ok(());
        };
        if seat_input.eq_ignore_ascii_case("map") {
            print_seat_grid(db, &show).await;
            continue;
        }
        if seat_input.eq_ignore_ascii_case("back") {
            return Ok(());
        }

        let seat_labels: Vec<String> = seat_input.split(',').map(str::to_string).collect();
        match bookings::reserve(db, user.id, show_id, &seat_labels).await {
            Ok(ids) => {
                let total = show.price * ids.len() as i64;
                println!("\nBooking confirmed!");
                println!("Movie: {}", show.title);
                println!("Show:  {} • {}", show.show_time, show.screen);
                println!(
                    "Seats: {}",
                    bookings::normalize_labels(&seat_labels).join(", ")
                );
                println!("Amount: ₹{total}");
                println!(
                    "Booking IDs: {}",
                    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
                );
                return Ok(());
            }
            Err(BookingError::Database(e)) => {
                error!("Booking on show {} failed: {:?}", show_id, e);
                println!("Something went wrong, the booking was aborted.");
                return Ok(());
            }
            Err(e) => {
                println!("Error: {e}");
                println!("Try again.");
            }
        }
    }
}

async fn view_bookings(db: &Database) -> Result<()> {
    let Some(phone) = prompt("Enter your phone: ")? else {
        return Ok(());
    };
    match bookings::bookings_for_phone(db, &phone).await {
        Ok(rows) => {
            print_heading("Your Bookings");
            if rows.is_empty() {
                println!("No bookings found.");
            }
            for booking in &rows {
                println!(
                    "[#{}] {} • {} • {} • Seat {} • ₹{} • at {}",
                    booking.id,
                    booking.title,
                    booking.show_time,
                    booking.screen,
                    booking.seat_label,
                    booking.amount_paid,
                    booking.booked_at
                );
            }
        }
        Err(e) => {
            error!("Failed to load bookings: {:?}", e);
            println!("Could not load bookings.");
        }
    }
    Ok(())
}

async fn cancel_booking(db: &Database) -> Result<()> {
    let Some(booking_id) = prompt_id("Enter Booking ID to cancel: ")? else {
        return Ok(());
    };
    match bookings::cancel(db, booking_id).await {
        Ok(true) => println!("Booking canceled and seat released."),
        Ok(false) => println!("Booking not found."),
        Err(e) => {
            error!("Failed to cancel booking {}: {:?}", booking_id, e);
            println!("Could not cancel the booking.");
        }
    }
    Ok(())
}
