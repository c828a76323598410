mod client;
mod request;
mod resources;
mod routes;

pub use client::ApiClient;
pub use request::{ApiRequest, Body, MultipartForm};
pub use routes::{routes, Routes};
