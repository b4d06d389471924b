// Domain layer - Core business logic

pub mod errors;
pub mod model;
pub mod pixel_format;
pub mod rules;
pub mod timing;
pub mod usecases;
