pub mod availability;
pub mod booking;
pub mod resource;
pub mod user;
