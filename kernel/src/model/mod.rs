pub mod auth;
pub mod availability;
pub mod booking;
pub mod id;
pub mod resource;
pub mod role;
pub mod user;
