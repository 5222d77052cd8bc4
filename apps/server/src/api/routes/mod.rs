//! Route tables, merged by [`crate::api::create_router`]

pub mod metrics;
pub mod search;
