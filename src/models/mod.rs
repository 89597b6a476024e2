pub mod common;
pub mod draw;
pub mod plan;
pub mod prize;
pub mod public;
pub mod result;

pub use common::*;
pub use draw::*;
pub use plan::*;
pub use prize::*;
pub use public::*;
pub use result::*;
