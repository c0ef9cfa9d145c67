pub mod booking;
pub mod movie;
pub mod seat;
pub mod show;
pub mod user;

pub use booking::BookingSummary;
pub use movie::Movie;
pub use seat::SeatStatus;
pub use show::{Show, ShowDetails};
pub use user::User;
