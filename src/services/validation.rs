use std::collections::BTreeMap;

use crate::api::middleware::error::{ApiError, ApiResult};
use crate::models::{CreatePersonRequest, UpdatePersonRequest};

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_name(errors: &mut BTreeMap<String, String>, name: &str) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.insert("name".to_string(), "name is required".to_string());
    } else if trimmed.len() < 3 || trimmed.len() > 100 {
        errors.insert(
            "name".to_string(),
            "name must be between 3 and 100 characters".to_string(),
        );
    }
}

fn check_cpf(errors: &mut BTreeMap<String, String>, cpf: &str) {
    let trimmed = cpf.trim();
    if trimmed.is_empty() {
        errors.insert("cpf".to_string(), "CPF is required".to_string());
    } else if trimmed.len() != 11 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        errors.insert(
            "cpf".to_string(),
            "CPF must be exactly 11 digits".to_string(),
        );
    }
}

fn check_email(errors: &mut BTreeMap<String, String>, email: &str) {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        errors.insert("email".to_string(), "email is required".to_string());
        return;
    }
    if !email_address::EmailAddress::is_valid(trimmed) {
        errors.insert(
            "email".to_string(),
            "invalid email format, must be user@domain.tld".to_string(),
        );
        return;
    }
    // Require a TLD (dot after @)
    if let Some(at_pos) = trimmed.find('@') {
        if !trimmed[at_pos + 1..].contains('.') {
            errors.insert(
                "email".to_string(),
                "email domain must include a TLD (e.g., .com, .org)".to_string(),
            );
        }
    }
}

fn check_password(errors: &mut BTreeMap<String, String>, password: &str) {
    if password.len() < 6 || password.len() > 100 {
        errors.insert(
            "password".to_string(),
            "password must be between 6 and 100 characters".to_string(),
        );
    }
}

pub fn validate_create_person(request: &CreatePersonRequest) -> ApiResult<()> {
    let mut errors = BTreeMap::new();

    check_name(&mut errors, &request.name);
    check_cpf(&mut errors, &request.cpf);
    check_email(&mut errors, &request.email);
    if request.password.trim().is_empty() {
        errors.insert("password".to_string(), "password is required".to_string());
    } else {
        check_password(&mut errors, &request.password);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub fn validate_update_person(request: &UpdatePersonRequest) -> ApiResult<()> {
    let mut errors = BTreeMap::new();

    check_name(&mut errors, &request.name);
    check_cpf(&mut errors, &request.cpf);
    check_email(&mut errors, &request.email);
    // Blank password means "keep the stored one", so only a supplied
    // non-blank value is length-checked
    if let Some(password) = request.password.as_deref() {
        if !password.trim().is_empty() {
            check_password(&mut errors, password);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub fn validate_ticket_fields(title: &str, notes: Option<&str>) -> ApiResult<()> {
    let mut errors = BTreeMap::new();

    let trimmed = title.trim();
    if trimmed.is_empty() {
        errors.insert("title".to_string(), "title is required".to_string());
    } else if trimmed.len() < 5 || trimmed.len() > 100 {
        errors.insert(
            "title".to_string(),
            "title must be between 5 and 100 characters".to_string(),
        );
    }

    if let Some(notes) = notes {
        if notes.len() > 500 {
            errors.insert(
                "notes".to_string(),
                "notes must be at most 500 characters".to_string(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreatePersonRequest {
        CreatePersonRequest {
            name: "Valid Name".to_string(),
            cpf: "12345678901".to_string(),
            email: "valid@example.com".to_string(),
            password: "secret123".to_string(),
            profiles: Vec::new(),
        }
    }

    #[test]
    fn test_valid_create_request_passes() {
        assert!(validate_create_person(&create_request()).is_ok());
    }

    #[test]
    fn test_short_name_rejected() {
        let mut request = create_request();
        request.name = "ab".to_string();
        let err = validate_create_person(&request).unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.contains_key("name")),
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_cpf_must_be_eleven_digits() {
        for bad in ["1234567890", "123456789012", "1234567890a", ""] {
            let mut request = create_request();
            request.cpf = bad.to_string();
            let err = validate_create_person(&request).unwrap_err();
            match err {
                ApiError::Validation(errors) => assert!(errors.contains_key("cpf")),
                _ => panic!("Expected validation error"),
            }
        }
    }

    #[test]
    fn test_email_requires_tld() {
        let mut request = create_request();
        request.email = "user@localhost".to_string();
        let err = validate_create_person(&request).unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.contains_key("email")),
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_missing_password_rejected_on_create() {
        let mut request = create_request();
        request.password = "  ".to_string();
        let err = validate_create_person(&request).unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.contains_key("password")),
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_blank_password_allowed_on_update() {
        let request = UpdatePersonRequest {
            name: "Valid Name".to_string(),
            cpf: "12345678901".to_string(),
            email: "valid@example.com".to_string(),
            password: Some("".to_string()),
        };
        assert!(validate_update_person(&request).is_ok());
    }

    #[test]
    fn test_short_update_password_rejected() {
        let request = UpdatePersonRequest {
            name: "Valid Name".to_string(),
            cpf: "12345678901".to_string(),
            email: "valid@example.com".to_string(),
            password: Some("123".to_string()),
        };
        assert!(validate_update_person(&request).is_err());
    }

    #[test]
    fn test_all_invalid_fields_reported_together() {
        let request = CreatePersonRequest {
            name: "".to_string(),
            cpf: "123".to_string(),
            email: "nonsense".to_string(),
            password: "".to_string(),
            profiles: Vec::new(),
        };
        let err = validate_create_person(&request).unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 4);
                for field in ["name", "cpf", "email", "password"] {
                    assert!(errors.contains_key(field));
                }
            }
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_short_title_rejected() {
        let err = validate_ticket_fields("abc", None).unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.contains_key("title")),
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_long_notes_rejected() {
        let notes = "x".repeat(501);
        assert!(validate_ticket_fields("Valid title", Some(&notes)).is_err());
        let notes = "x".repeat(500);
        assert!(validate_ticket_fields("Valid title", Some(&notes)).is_ok());
    }

    #[test]
    fn test_normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  User@Example.COM  "), "user@example.com");
    }
}
