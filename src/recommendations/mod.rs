pub mod engine;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod rules;
pub mod season;
mod service;

pub use engine::RecommendationEngine;
pub use progress::ActionProgressStore;
pub use service::RecommendationService;
