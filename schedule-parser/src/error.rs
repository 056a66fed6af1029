use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("Expected an hours range in the format HH:mm - HH:mm, got `{0}`")]
    HoursRange(String),
    #[error("Invalid time `{0}`")]
    Time(String),
    #[error("Hours range `{0}` ends before it starts")]
    EndBeforeStart(String),
    #[error("Expected a date in the format dd/MM/yyyy, got `{0}`")]
    Date(String),
}
