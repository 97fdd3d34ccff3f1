pub mod a_star;
pub mod common;
pub mod planner;
pub mod priority_queue;
