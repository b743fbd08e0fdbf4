pub mod bbox;
pub mod detection;
pub mod errors;
pub mod labels;
pub mod media;
pub mod metrics;
pub mod model;
