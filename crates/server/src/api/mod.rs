//! # API Routes
//!
//! - `documents` - document store CRUD
//! - `storefront` - catalog, search, draft, cart and config for the session

pub mod documents;
pub mod storefront;
