//! Computational steps of the dissociation engine.
//!
//! Each task is a free function operating on a [`CoreContext`](super::context::CoreContext)
//! or on the records produced by an earlier task. Tasks hold no state; the
//! [`Dissociater`](super::dissociater::Dissociater) owns the data and decides the order
//! in which they run.

pub mod bulk_filter;
pub mod combinations;
pub mod pairing;
pub mod topology;
