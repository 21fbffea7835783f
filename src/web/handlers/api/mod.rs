//! API 处理器

pub mod health;
pub mod metrics;
pub mod translation;

pub use health::*;
pub use metrics::*;
pub use translation::*;
