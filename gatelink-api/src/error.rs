#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeOfDayError {
    #[error("Minute of day {0} is outside 0..=1439")]
    OutOfRange(u32),

    #[error("Invalid time format '{0}', expected HH:MM")]
    InvalidFormat(String),
}
