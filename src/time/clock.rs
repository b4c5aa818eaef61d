use chrono::NaiveDateTime;

/// A port that provides the **current instant** for the application.
///
/// # Purpose
/// Record timestamps (`created_at` / `updated_at`) are taken from this trait so
/// that store logic never reads the system clock directly and tests can pin
/// time to a known value.
///
/// # Design Notes
/// - Values are naive UTC instants; storage columns carry no time zone.
/// - This trait represents an **external capability**, similar to a Repository.
///
/// # Typical Implementations
/// - `SystemClock`: Uses the OS clock
/// - `FixedClock`: Returns a constant instant (for testing)
pub trait Clock: Send + Sync {
    /// Returns the current UTC instant as a [`NaiveDateTime`].
    fn now(&self) -> NaiveDateTime;
}
