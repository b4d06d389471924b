//! Media file measurement and constraints loading

pub mod hasher;
pub mod inspector;
pub mod sampler;
pub mod sniffer;
pub mod validator;

pub use hasher::ContentHasher;
pub use inspector::MediaInspector;
pub use sampler::{FrameSampler, SampleOutcome};
pub use validator::{ConstraintsFormat, ConstraintsValidator, LintReport};
