pub mod cache;
pub mod crow_flies;
pub mod distance_provider;
pub mod nominatim;
pub mod osrm;
