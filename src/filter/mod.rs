pub mod error;
pub mod page;
pub mod types;

pub use error::FilterError;
pub use page::{like_pattern, page_count, Page, PageMeta, PageQuery, PageRequest};
pub use types::*;
