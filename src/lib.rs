pub mod account;
pub mod config;
pub mod form;
pub mod handler;
pub mod locale;
pub mod middleware;
pub mod notification;
pub mod security;
pub mod session;
pub mod submission;
pub mod templating;
pub mod translation;

#[cfg(test)]
mod testing;
