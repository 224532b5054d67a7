//! Business logic: ranking helpers, the TF-IDF vector space, and the
//! personalized recommendation engine.

pub mod rankings;
pub mod recommendations;
pub mod similarity;
