pub mod pagination;
pub mod subscription;

pub use pagination::*;
pub use subscription::*;
