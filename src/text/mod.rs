// Text preparation shared by the model and keyword classifiers.

pub mod normalize;

pub use normalize::normalize;
