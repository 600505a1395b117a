pub mod page;

pub use page::{Direction, PageRequest, Pageable, PageableDefault, Sort, SortField};
