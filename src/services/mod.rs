pub mod vehicle_api;
