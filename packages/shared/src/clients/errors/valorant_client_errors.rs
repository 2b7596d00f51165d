use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ValorantClientError {
    MissingApiKey,
    InvalidBaseUrl(String),
    PlayerNotFound,
    RateLimited,
    Upstream(u16),
    Network(String),
    InvalidResponse(String),
}

impl ValorantClientError {
    /// Failures worth another attempt later: throttling, transport errors and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            ValorantClientError::RateLimited | ValorantClientError::Network(_) => true,
            ValorantClientError::Upstream(status) => *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for ValorantClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValorantClientError::MissingApiKey => write!(f, "API configuration error"),
            ValorantClientError::InvalidBaseUrl(url) => {
                write!(f, "Invalid Valorant API base URL: {}", url)
            }
            ValorantClientError::PlayerNotFound => write!(
                f,
                "Player not found. Please check your Valorant Name and Tag ID."
            ),
            ValorantClientError::RateLimited => {
                write!(f, "Too many requests. Please try again in a minute.")
            }
            ValorantClientError::Upstream(status) => write!(f, "API request failed: {}", status),
            ValorantClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ValorantClientError::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for ValorantClientError {}
