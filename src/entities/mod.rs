pub mod draws;
pub mod plans;
pub mod prizes;
pub mod results;

pub use draws as draw_entity;
pub use plans as plan_entity;
pub use prizes as prize_entity;
pub use results as result_entity;
