pub mod error;
pub mod order;
pub mod repository;
pub mod user;
