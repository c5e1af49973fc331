pub mod runner;
pub mod tick;

pub use runner::Scheduler;
pub use tick::initialize;
