pub mod core;
pub mod exams;
pub mod guard;
pub mod lab;
pub mod profile;
pub mod questions;
pub mod reports;
pub mod session;
