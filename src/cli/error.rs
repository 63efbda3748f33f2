// Error handling utilities for consistent error messages and exit codes

use std::process;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Format a user error message with context
pub fn user_error_with_context(message: &str, context: &str) -> ! {
    eprintln!("Error: {} ({})", message, context);
    process::exit(1);
}

/// Validate that a stage ID is valid (positive integer)
pub fn validate_stage_id(id_str: &str) -> Result<i64, String> {
    id_str.parse::<i64>()
        .map_err(|_| format!("Invalid stage ID: '{}'. Stage ID must be a number.", id_str))
        .and_then(|id| {
            if id > 0 {
                Ok(id)
            } else {
                Err(format!("Invalid stage ID: {}. Stage ID must be positive.", id))
            }
        })
}
