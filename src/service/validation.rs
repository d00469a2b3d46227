//! Request validation: required keys and field formats.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub struct RequestValidator;

impl RequestValidator {
    /// Every listed key must be present in the body. Reports the first one
    /// missing as "Missing <key>".
    pub fn require(body: &Map<String, Value>, keys: &[&str]) -> Result<(), AppError> {
        match keys.iter().find(|k| !body.contains_key(**k)) {
            Some(k) => Err(AppError::missing(k)),
            None => Ok(()),
        }
    }

    /// A string field, if present, must look like an email address.
    pub fn email(body: &Map<String, Value>, key: &str) -> Result<(), AppError> {
        static EMAIL: OnceLock<Regex> = OnceLock::new();
        let re = EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("static email pattern"));
        match body.get(key) {
            Some(Value::String(s)) if !re.is_match(s) => {
                Err(AppError::Validation(format!("{} must be a valid email", key)))
            }
            _ => Ok(()),
        }
    }

    /// A field, if present, must be a string id.
    pub fn id_string<'a>(body: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, AppError> {
        match body.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(AppError::Validation(format!("{} must be a string", key))),
        }
    }
}
