pub mod auth;
pub mod booking;
pub mod health;
pub mod resource;
pub mod user;
pub mod v1;
