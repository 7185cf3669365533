pub mod catalog;
pub mod index;
pub mod table;

pub use catalog::catalog;
pub use index::PageIndex;
pub use table::{Column, PageSpec, TablePage, render_rows};
