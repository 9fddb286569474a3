//! Reusable UI components

pub mod camera_scanner;
pub mod loading;
pub mod notice;
pub mod recent_activity;
pub mod sidebar;
pub mod stat_card;
