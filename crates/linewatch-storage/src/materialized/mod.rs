//! Materialized views: aggregate read models over the crossing log.

pub mod summary;
