/// Unconstrained charge-as-soon-as-possible reference run.
pub mod baseline;
/// Scenario comparison and savings.
pub mod compare;
pub mod cost;
/// Dense per-bin load and charger-count accumulators.
pub mod curve;
pub mod greedy;
/// Fixed-width time bins over the simulation horizon.
pub mod grid;
pub mod report;
pub mod tariff;
pub mod types;
