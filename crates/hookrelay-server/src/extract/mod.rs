//! Enhanced HTTP request extractors with improved error handling and validation.
//!
//! This module provides custom Axum extractors that enhance the default
//! functionality with better error messages, validation, logging, and type
//! safety. All extractors are designed to be drop-in replacements for their
//! standard Axum counterparts.
//!
//! # Extractor Categories
//!
//! ## Tenant Scope
//!
//! - [`TenantContext`] - Explicit request-scoped tenant/account identity
//!
//! ## Request Data Extraction
//!
//! - [`Json`] - Enhanced JSON deserialization with better error messages
//! - [`ValidateJson`] - JSON extraction with automatic validation
//! - [`Path`] - Path parameter extraction with detailed error context
//! - [`Query`] - Query parameter extraction with enhanced error messages
//!
//! ## Infrastructure
//!
//! - [`PgPool`] - Pooled database connection acquisition

mod pg_connection;
mod reject;
mod tenant;

pub use pg_connection::PgPool;
pub use reject::{Json, Path, Query, ValidateJson};
pub use tenant::TenantContext;
