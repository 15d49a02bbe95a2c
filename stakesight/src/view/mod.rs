//! View components for the StakeSight application.

pub mod chart;
pub mod components;
pub mod dashboard;
pub mod formatting;
pub mod icons;
pub mod theme;
