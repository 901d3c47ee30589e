/// CSV and JSON export of run results.
pub mod export;
/// Session CSV ingest.
pub mod sessions;
