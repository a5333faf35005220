pub mod cache;
pub mod grouping;
pub mod path;
pub mod similarity;
pub mod tokenization;
