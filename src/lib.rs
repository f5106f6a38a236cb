//! Socks Inventory API Library
//!
//! This crate provides the core functionality for the socks inventory
//! accounting service.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub sock_service: services::socks::SockService,
    pub import_service: services::sock_import::SockImportService,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        Self {
            sock_service: services::socks::SockService::new(db.clone()),
            import_service: services::sock_import::SockImportService::new(db.clone()),
            db,
            config,
        }
    }
}

/// Composes the full application router: status + health + sock endpoints
/// + Swagger UI.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "socks-api up" }))
        .route("/health", get(handlers::health::health_check))
        .nest("/socks", handlers::socks::socks_router())
        .merge(openapi::swagger_ui())
        .with_state(state)
}
