//! HTTP client shared by network integrations

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
