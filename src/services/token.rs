//! Daily attendance token

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::config::TokenConfig;

/// Token for `date`: prefix followed by six upper-case hex digits of
/// SHA-256("<salt>:<YYYY-MM-DD>").
pub fn compute_daily_token(prefix: &str, salt: &str, date: NaiveDate) -> String {
    let digest = Sha256::digest(format!("{}:{}", salt, date.format("%Y-%m-%d")).as_bytes());
    format!("{}{}", prefix, hex::encode_upper(&digest[..3]))
}

#[derive(Debug, Clone)]
pub struct TokenService {
    prefix: String,
    salt: String,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            salt: config.salt.clone(),
        }
    }

    pub fn token_for(&self, date: NaiveDate) -> String {
        compute_daily_token(&self.prefix, &self.salt, date)
    }

    /// Exact match against the token of `date`
    pub fn verify(&self, date: NaiveDate, submitted: &str) -> bool {
        self.token_for(date) == submitted
    }
}
