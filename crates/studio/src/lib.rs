//! Storeloom Studio library.
//!
//! The client-resident state layer of a multi-tenant storefront builder.
//! One [`Studio`] owns every tenant [`Store`](models::Store), the active-tenant
//! selection, the global payment credentials, the shopping cart and the
//! notification list.
//!
//! # Layers
//!
//! - [`collection`] - tenant list + active selection, identity-based replace
//! - [`studio`] - every mutation, built on "update the active tenant"
//! - [`catalog`] - best-effort mirroring of products into the payment catalog
//! - [`persistence`] - full-snapshot saves to a key-value backend
//! - [`notifications`] - auto-expiring user-facing messages
//! - [`ai`] / [`auth`] - contracts for external collaborators
//!
//! # Runtime
//!
//! Mutations are synchronous and take `&mut Studio`. Detached work
//! (snapshot writes, catalog sync, notification expiry) runs on the Tokio
//! runtime the studio was opened on and only feeds back through
//! [`Studio::reconcile_catalog`] and [`notifications::NotificationCenter::dismiss`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod auth;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod notifications;
pub mod persistence;
pub mod studio;

pub use collection::{PlatformCredentials, TenantCollection};
pub use config::StudioConfig;
pub use error::{Rejection, StudioError};
pub use studio::{Studio, StudioBuilder};
