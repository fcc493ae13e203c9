pub mod dashboard;
pub mod device;
pub mod devices;
