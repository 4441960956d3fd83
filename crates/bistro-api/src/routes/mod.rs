pub mod health;
pub mod messages;
pub mod restaurants;
pub mod threads;
