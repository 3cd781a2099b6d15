//! Núcleo cliente del back-office de transporte
//!
//! Servicios REST multi-tenant para órdenes, partes, direcciones, perfiles
//! y geografía, con cache en memoria y validación de formularios.

pub mod cache;
pub mod clients;
pub mod config;
pub mod dto;
pub mod models;
pub mod queries;
pub mod services;
pub mod state;
pub mod utils;

pub use state::{AppContext, Session, SessionContext};
pub use utils::errors::{AppError, AppResult};
