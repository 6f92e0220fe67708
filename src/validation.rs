use colored::Colorize;
use inquire::Text;
use validator::ValidateEmail;

use crate::{error::AppError, manifest::Manifest};

/// Maximum length for a coauthor ID
const MAX_ID_LENGTH: usize = 64;
/// Maximum length for a display name
const MAX_NAME_LENGTH: usize = 100;
/// Maximum length for an email address
const MAX_EMAIL_LENGTH: usize = 254;

/// Prompts user for input until valid input is provided
pub fn prompt_until_valid<F>(prompt_message: &str, input_validation: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message).prompt()?;
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(AppError::DuplicateCoauthor(id)) => {
                println!("{}", format!("ID \"{id}\" already exists").red())
            }
            Err(e) => return Err(e),
        }
    }
}

/// Validates a coauthor ID
///
/// Uniqueness is checked case-insensitively against `manifest`.
pub fn validate_input_id(id: &str, manifest: &Manifest) -> Result<(), AppError> {
    if id.is_empty() {
        Err(AppError::Validation("ID cannot be empty".to_string()))
    } else if id.chars().count() > MAX_ID_LENGTH {
        Err(AppError::Validation(format!("ID too long (max {MAX_ID_LENGTH} characters)")))
    } else if id.chars().any(char::is_whitespace) {
        Err(AppError::Validation("ID cannot contain whitespace".to_string()))
    } else if manifest.find(&[id]).is_ok() {
        Err(AppError::DuplicateCoauthor(id.to_string()))
    } else {
        Ok(())
    }
}

/// Validates a display name
pub fn validate_input_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        Err(AppError::Validation("Name cannot be empty".to_string()))
    } else if name.chars().count() > MAX_NAME_LENGTH {
        Err(AppError::Validation(format!("Name too long (max {MAX_NAME_LENGTH} characters)")))
    } else if name.contains('"') {
        Err(AppError::Validation("Name cannot contain '\"'".to_string()))
    } else {
        Ok(())
    }
}

/// Validates an email address
pub fn validate_input_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        Err(AppError::Validation("Email cannot be empty".to_string()))
    } else if email.len() > MAX_EMAIL_LENGTH {
        Err(AppError::Validation(format!("Email too long (max {MAX_EMAIL_LENGTH} characters)")))
    } else if email.contains(['<', '>']) || !email.validate_email() {
        Err(AppError::Validation("Invalid email format".to_string()))
    } else {
        Ok(())
    }
}
