// Library exports for the automotive market dashboard

pub mod config;
pub mod dashboard;
pub mod data;
