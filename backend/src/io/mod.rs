//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services. Currently a
//! single axum REST API under `/api`.

pub mod rest;
