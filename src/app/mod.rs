// Application layer - Use case interactors

pub mod check_interactor;
pub mod container;

// Re-export interactors
pub use check_interactor::{BatchItem, CheckInteractor, CheckOutcome, CheckRequest, CheckResponse};
pub use container::{AppContainer, DefaultAppContainer};
