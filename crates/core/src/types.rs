/// Machine identifiers are plain integers assigned by the plant.
pub type MachineId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
