pub mod draw_service;
pub mod integrity;
pub mod plan_service;
pub mod prize_service;
pub mod public_service;
pub mod result_service;
pub mod validation;

pub use draw_service::*;
pub use plan_service::*;
pub use prize_service::*;
pub use public_service::*;
pub use result_service::*;
pub use validation::WinningNumbersPolicy;
