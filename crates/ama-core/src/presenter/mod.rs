//! Presenter - ranked, render-ready views of the store

mod ranked_view;

pub use ranked_view::{rank, RankedEntry, RankedView};
