pub mod calendar;
pub mod drag;
pub mod filter;
pub mod planner;
pub mod select;
pub mod store;
pub mod task;
