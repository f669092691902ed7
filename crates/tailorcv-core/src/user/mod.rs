//! User domain model.

mod model;

pub use model::User;
