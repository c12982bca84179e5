//! Page generators. Each one borrows the shared [`BuildContext`] and renders
//! through the same [`OrderedRenderer`].
//!
//! [`BuildContext`]: crate::build::BuildContext
//! [`OrderedRenderer`]: crate::render::OrderedRenderer

mod common;
mod indices;
mod landing;
mod posts;

pub use common::entry_lines;
pub use indices::{AuthorList, DateList, ListStrategy, TagList, YearList, write_index_pages};
pub use landing::{featured, newest_excluding_featured, write_landing};
pub use posts::write_posts;
