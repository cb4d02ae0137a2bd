//! The three page renderers plus the pieces they share.

pub mod detail;
pub mod map;
pub mod page;
pub mod polls;
pub mod tracker;

pub use page::{error_page, Page, ERROR_BANNER};
