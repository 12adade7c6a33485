pub mod error;
pub mod flight;
pub mod gear;
pub mod params;
pub mod report;
pub mod window;
