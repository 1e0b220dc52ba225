pub mod handlers;
pub mod models;
pub mod provider;
mod service;
pub mod store;

pub use service::WeatherDataService;
pub use store::FarmDataStore;
