//! Fallible parsers for each dialogue field

use thiserror::Error;

use crate::journal::{Direction, Session};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("empty input")]
    Empty,

    #[error("not a direction: {0}")]
    Direction(String),

    #[error("not a session: {0}")]
    Session(String),

    #[error("not a number: {0}")]
    Number(String),

    #[error("risk must be positive, got {0}")]
    NonPositiveRisk(f64),

    #[error("not a trade id: {0}")]
    TradeId(String),
}

pub fn parse_pair(text: &str) -> Result<String, InputError> {
    let pair = text.trim();
    if pair.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(pair.to_uppercase())
}

pub fn parse_direction(text: &str) -> Result<Direction, InputError> {
    Direction::normalize(text).ok_or_else(|| InputError::Direction(text.to_string()))
}

pub fn parse_session(text: &str) -> Result<Session, InputError> {
    Session::normalize(text).ok_or_else(|| InputError::Session(text.to_string()))
}

/// Finite real number, optional sign (`+2`, `-1`, `0.5`)
pub fn parse_r(text: &str) -> Result<f64, InputError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::Number(text.to_string())),
    }
}

pub fn parse_risk(text: &str) -> Result<f64, InputError> {
    let risk = parse_r(text)?;
    if risk <= 0.0 {
        return Err(InputError::NonPositiveRisk(risk));
    }
    Ok(risk)
}

pub fn parse_trade_id(text: &str) -> Result<u64, InputError> {
    text.trim()
        .parse::<u64>()
        .map_err(|_| InputError::TradeId(text.to_string()))
}

/// First letter upper, rest lower: "target HIT" -> "Target hit"
pub fn capitalize(text: &str) -> String {
    let mut chars = text.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
