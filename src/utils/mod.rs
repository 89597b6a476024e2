pub mod deadline;

pub use deadline::within_deadline;
