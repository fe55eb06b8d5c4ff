pub mod class_session;
pub mod transaction;

pub use class_session::{ClassInput, ClassSession, NewClassSession, DEFAULT_COLOR};
pub use transaction::MonthRange;
