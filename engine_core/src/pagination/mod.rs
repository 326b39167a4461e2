//! Ordering and pagination shared by listing, search and grouped aggregation

pub mod cursor;
pub mod offset;
pub mod order;

pub use cursor::{decode_cursor, encode_cursor, paginate_by_cursor, CursorPage};
pub use offset::{paginate, slice_window, Page, PageMeta, PageRequest};
pub use order::{compare_values, sort_by_field, OrderDirection};
