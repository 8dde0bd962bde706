// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod agent;
pub mod area;
pub mod auth;
pub mod blog;
pub mod lenient;
pub mod locale;
pub mod property;

pub use agent::*;
pub use area::*;
pub use auth::*;
pub use blog::*;
pub use lenient::{Page, Pagination};
pub use locale::*;
pub use property::*;
