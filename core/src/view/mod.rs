pub mod ordered;

pub use ordered::OrderedView;
