//! Core record pipeline
//!
//! Raw delimited text is normalized into an immutable [`record::RecordSet`].
//! Everything downstream (filtering, sorting, paging) produces views over
//! that set and never mutates it.

pub mod criteria;
pub mod exporter;
pub mod normalizer;
pub mod paginator;
pub mod pipeline;
pub mod predicates;
pub mod record;
pub mod record_compare;
pub mod record_view;
pub mod summary;
pub mod timestamp;
