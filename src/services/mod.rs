// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod backend_client;
pub mod filters;
pub mod phone;
pub mod session;
pub mod suggestion;
pub mod throttle;

pub use backend_client::{BackendClient, CallContext, NO_QUERY};
pub use filters::*;
pub use phone::*;
pub use session::*;
pub use suggestion::*;
pub use throttle::*;
