use std::fmt;

use uuid::Uuid;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Timeout,
    NotConnected,
    Protocol(String),
    UnknownGroup(u8),
    UnknownAc(u8),
    UnsupportedHvacMode(String),
    UnsupportedFanMode(String),
    InvalidTemperature(f64),
    UpdateFailed(String),
    NotReady(String),
    NoUnits,
    EntryNotLoaded(Uuid),
    Json(serde_json::Error),
}

impl Error {
    /// Transport-level failures: refused, timed out, dropped session.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Timeout | Error::NotConnected)
    }

    /// Rejected command arguments. No device state was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedHvacMode(_)
                | Error::UnsupportedFanMode(_)
                | Error::InvalidTemperature(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Timeout => write!(f, "request timed out"),
            Error::NotConnected => write!(f, "not connected"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Error::UnknownGroup(id) => write!(f, "unknown group: {id}"),
            Error::UnknownAc(id) => write!(f, "unknown AC: {id}"),
            Error::UnsupportedHvacMode(mode) => write!(f, "HVAC mode not supported: {mode}"),
            Error::UnsupportedFanMode(mode) => write!(f, "fan mode not supported: {mode}"),
            Error::InvalidTemperature(t) => write!(f, "invalid target temperature: {t}"),
            Error::UpdateFailed(msg) => write!(f, "update failed: {msg}"),
            Error::NotReady(msg) => write!(f, "not ready, retry later: {msg}"),
            Error::NoUnits => write!(f, "no usable units found"),
            Error::EntryNotLoaded(id) => write!(f, "config entry not loaded: {id}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::TimedOut {
            return Error::Timeout;
        }
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
