//! Error types shared across the crate.

/// Rejected user input. Raised before anything is written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a number, got {input:?}")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Failure talking to the FoodData Central API.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Network, TLS or body decoding failure.
    #[error("food lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("food lookup API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// The key-value backend itself failed. Malformed stored data never ends up here.
#[derive(Debug, thiserror::Error)]
#[error("entry store backend failed: {0:#}")]
pub struct StoreError(#[from] pub anyhow::Error);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses a strictly positive, finite number typed by the user.
pub fn parse_positive(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field,
            input: input.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field,
            input: input.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}
