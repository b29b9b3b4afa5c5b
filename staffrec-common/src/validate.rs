//! Employee input validation and normalization
//!
//! Validation collects every failure instead of stopping at the first one,
//! so a client can highlight all offending fields from a single 422
//! response. Normalization (capitalizing person names, uppercasing the
//! currency code) is applied before the bound checks, which makes
//! validation idempotent: an `Employee` read back from storage passes the
//! same checks as the input it was created from.

use crate::api::types::{EmployeeIn, FieldError};

/// Person name fields are bounded to the storage column width
pub const MAX_NAME_LEN: usize = 100;
/// Topic and post names
pub const MAX_LONG_NAME_LEN: usize = 500;
/// Title names
pub const MAX_TITLE_LEN: usize = 200;

/// Validate and normalize an employee document in place.
///
/// Returns the full list of field errors; an empty list means the
/// document is valid and has been normalized.
pub fn validate_employee(employee: &mut EmployeeIn) -> Vec<FieldError> {
    let mut errors = Vec::new();

    employee.name = capitalize(&employee.name);
    employee.surname = capitalize(&employee.surname);
    employee.patronymic = capitalize(&employee.patronymic);
    employee.salary.currency = employee.salary.currency.trim().to_uppercase();
    for title in &mut employee.titles {
        *title = title.trim().to_string();
    }

    check_name(&employee.name, &["name"], &mut errors);
    check_name(&employee.surname, &["surname"], &mut errors);
    check_name(&employee.patronymic, &["patronymic"], &mut errors);

    if employee.department_number <= 0 {
        errors.push(FieldError::new(
            &["department_number"],
            "must be a positive number",
            "value_error.not_positive",
        ));
    }
    if employee.service_number <= 0 {
        errors.push(FieldError::new(
            &["service_number"],
            "must be a positive number",
            "value_error.not_positive",
        ));
    }

    check_bounded(&employee.topic_name, &["topic_name"], MAX_LONG_NAME_LEN, &mut errors);
    if employee.topic_number <= 0 {
        errors.push(FieldError::new(
            &["topic_number"],
            "must be a positive number",
            "value_error.not_positive",
        ));
    }
    check_bounded(&employee.post_name, &["post_name"], MAX_LONG_NAME_LEN, &mut errors);
    if employee.post_code <= 0 {
        errors.push(FieldError::new(
            &["post_code"],
            "must be a positive number",
            "value_error.not_positive",
        ));
    }

    if !(employee.salary.amount.is_finite() && employee.salary.amount >= 0.0) {
        errors.push(FieldError::new(
            &["salary", "amount"],
            "must be a non-negative amount",
            "value_error.negative_amount",
        ));
    }
    if employee.salary.currency.len() != 3
        || !employee.salary.currency.chars().all(|c| c.is_ascii_alphabetic())
    {
        errors.push(FieldError::new(
            &["salary", "currency"],
            "must be a 3-letter currency code",
            "value_error.currency_code",
        ));
    }

    for (i, title) in employee.titles.iter().enumerate() {
        if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
            errors.push(FieldError::new(
                &["titles", &i.to_string()],
                format!("must be 1 to {} characters", MAX_TITLE_LEN),
                "value_error.length",
            ));
        }
    }

    errors
}

/// First letter uppercase, the rest lowercase, surrounding whitespace dropped
pub fn capitalize(value: &str) -> String {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

// Bounds count characters, not bytes: Cyrillic names are two bytes each
fn check_name(value: &str, loc: &[&str], errors: &mut Vec<FieldError>) {
    if value.is_empty() || value.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new(
            loc,
            format!("must be 1 to {} characters", MAX_NAME_LEN),
            "value_error.length",
        ));
    } else if !value.chars().all(|c| c.is_alphabetic() || c == '-') {
        errors.push(FieldError::new(
            loc,
            "must contain only letters or hyphens",
            "value_error.name_chars",
        ));
    }
}

fn check_bounded(value: &str, loc: &[&str], max: usize, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() || value.chars().count() > max {
        errors.push(FieldError::new(
            loc,
            format!("must be 1 to {} characters", max),
            "value_error.length",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Salary;
    use chrono::NaiveDate;

    fn sample() -> EmployeeIn {
        EmployeeIn {
            name: "ivan".to_string(),
            surname: "PETROV".to_string(),
            patronymic: "sergeevich".to_string(),
            department_number: 2,
            service_number: 1042,
            employment_date: NaiveDate::from_ymd_opt(2020, 3, 16).unwrap(),
            topic_name: "Radio telemetry".to_string(),
            topic_number: 7,
            post_code: 11,
            post_name: "Senior engineer".to_string(),
            salary: Salary {
                amount: 1500.0,
                currency: "usd".to_string(),
            },
            titles: vec!["Engineer".to_string()],
        }
    }

    #[test]
    fn valid_input_is_normalized() {
        let mut employee = sample();
        let errors = validate_employee(&mut employee);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(employee.name, "Ivan");
        assert_eq!(employee.surname, "Petrov");
        assert_eq!(employee.patronymic, "Sergeevich");
        assert_eq!(employee.salary.currency, "USD");
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut employee = sample();
        validate_employee(&mut employee);
        let normalized = employee.clone();
        let errors = validate_employee(&mut employee);
        assert!(errors.is_empty());
        assert_eq!(employee, normalized);
    }

    #[test]
    fn collects_all_field_errors() {
        let mut employee = sample();
        employee.name = "".to_string();
        employee.service_number = 0;
        employee.salary.currency = "DOLLARS".to_string();

        let errors = validate_employee(&mut employee);
        let locs: Vec<Vec<String>> = errors.iter().map(|e| e.loc.clone()).collect();
        assert!(locs.contains(&vec!["name".to_string()]));
        assert!(locs.contains(&vec!["service_number".to_string()]));
        assert!(locs.contains(&vec!["salary".to_string(), "currency".to_string()]));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn name_bounds_count_characters_not_bytes() {
        let mut employee = sample();
        // 60 Cyrillic characters is 120 bytes, still within the bound
        employee.surname = "Б".repeat(60);
        let errors = validate_employee(&mut employee);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);

        employee.surname = "б".repeat(MAX_NAME_LEN + 1);
        let errors = validate_employee(&mut employee);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["surname"]);
    }

    #[test]
    fn rejects_overlong_name() {
        let mut employee = sample();
        employee.surname = "a".repeat(MAX_NAME_LEN + 1);
        let errors = validate_employee(&mut employee);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["surname"]);
        assert_eq!(errors[0].kind, "value_error.length");
    }

    #[test]
    fn rejects_bad_title_entry() {
        let mut employee = sample();
        employee.titles.push("   ".to_string());
        let errors = validate_employee(&mut employee);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["titles", "1"]);
    }

    #[test]
    fn capitalize_handles_unicode_and_empty() {
        assert_eq!(capitalize("  борис "), "Борис");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("o"), "O");
    }
}
