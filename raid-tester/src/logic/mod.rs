pub mod check;
pub mod reports;
pub mod roster;
pub mod seeds;
pub mod sweep;

pub use check::{GateReport, run_check};
pub use roster::RosterCatalog;
pub use seeds::resolve_seed_inputs;
pub use sweep::{SweepAggregate, SweepPlan, run_sweep};
