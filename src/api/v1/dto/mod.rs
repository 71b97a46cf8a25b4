pub mod auth;
pub mod cats;
