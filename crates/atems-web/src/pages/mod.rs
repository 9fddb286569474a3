//! Page components for the web interface

pub mod checkinout;
pub mod dashboard;
pub mod not_found;
