pub mod config;
pub mod data;
pub mod session;
pub mod utils;

pub use data::criteria::FilterCriteria;
pub use data::normalizer::{
    normalize, normalize_path, normalize_reader, normalize_rows, NormalizedSet, RejectReason,
    RowRejection, SchemaError,
};
pub use data::paginator::{Page, PageError};
pub use data::pipeline::{apply_filters, paginate, sort_records};
pub use data::record::{Record, RecordSet};
pub use data::record_compare::SortKey;
pub use data::record_view::RecordView;
pub use session::{Query, Session};
