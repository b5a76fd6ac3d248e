mod source;
mod worker;

pub use source::StatusSource;
pub use worker::{start, CancelHandle};
