//! Journey listing: sort orders, query keys and the page cache.

mod page_cache;
mod query;

pub use page_cache::JourneyPageCache;
pub use query::{
    PageRequest, QueryKey, SortColumn, SortOrder, clamp_page_index, journeys_path, page_bounds,
    sort_segment,
};
