pub mod admin;
pub mod api;
pub mod auth;
pub mod category;
pub mod cli;
pub mod conf;
pub mod email_client;
pub mod error;
pub mod notify;
pub mod pages;
pub mod session;
pub mod text;
