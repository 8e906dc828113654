pub mod cascade;
pub mod model;
pub mod refs;
pub mod toggle;
pub mod validation;

pub use refs::RefList;
pub use toggle::Toggle;
pub use cascade::{DeletionPlan, DeletionReport, DeletionStep};
