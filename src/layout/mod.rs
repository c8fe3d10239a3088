//! Pagination geometry: height arithmetic and page records

pub mod arithmetic;
mod pagination;

pub use arithmetic::{
    break_chrome_height, page_count_for, page_stride, paginated_height, single_page_baseline,
    HeightArithmetic,
};
pub use pagination::{build_pages, page_at, PageRecord};
