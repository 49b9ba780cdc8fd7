// src/application/error_handling.rs
//
// Error Handling for Operator Commands
//
// ARCHITECTURE:
// - Maps internal errors → short operator-facing messages
// - Full error goes to the log, never to the message

use crate::error::AppError;

/// Plain message for a failed command.
pub fn operator_message(error: &AppError) -> String {
    match error {
        AppError::Domain(domain_error) => domain_error.to_string(),

        AppError::Config(message) => message.clone(),

        AppError::Http(_) | AppError::Metadata { .. } | AppError::Scrape(_) => {
            log::error!("External service error: {}", error);
            "An external service did not answer, please try again.".to_string()
        }

        AppError::Persistence(_) | AppError::Io(_) | AppError::Serialization(_) => {
            log::error!("Watchlist store error: {}", error);
            "Could not read or write the watchlist, please try again.".to_string()
        }

        AppError::CircuitOpen(_) | AppError::Other(_) => {
            log::error!("Command failed: {}", error);
            "Error occurred, please try again.".to_string()
        }
    }
}

/// Helper trait to turn command results into operator messages
pub trait ToOperatorMessage<T> {
    fn to_operator_message(self) -> Result<T, String>;
}

impl<T> ToOperatorMessage<T> for Result<T, AppError> {
    fn to_operator_message(self) -> Result<T, String> {
        self.map_err(|e| operator_message(&e))
    }
}
