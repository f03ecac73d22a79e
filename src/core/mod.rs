pub mod marker;
pub mod schedule;
pub mod todo;
pub mod transition;
pub mod urgency;
