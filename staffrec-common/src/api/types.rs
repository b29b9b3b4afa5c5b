//! Wire types shared by the backend and the desktop client
//!
//! The employee aggregate is transferred as one document: the scalar
//! fields plus the topic, post, salary and title attachments. Server-side
//! normalization (capitalization, currency uppercasing) happens before
//! storage, so a stored `Employee` read back always satisfies the same
//! constraints as validated input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Salary attachment: amount in a named ISO-4217-style currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub amount: f64,
    /// 3-letter uppercase currency code
    pub currency: String,
}

/// Employee aggregate as submitted by a client (no server-assigned id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeIn {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub department_number: i64,
    /// Unique per employee across the whole organization
    pub service_number: i64,
    pub employment_date: NaiveDate,
    pub topic_name: String,
    pub topic_number: i64,
    pub post_code: i64,
    pub post_name: String,
    pub salary: Salary,
    pub titles: Vec<String>,
}

/// Employee aggregate as stored, with its server-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub department_number: i64,
    pub service_number: i64,
    pub employment_date: NaiveDate,
    pub topic_name: String,
    pub topic_number: i64,
    pub post_code: i64,
    pub post_name: String,
    pub salary: Salary,
    pub titles: Vec<String>,
}

impl Employee {
    /// Strip the server-assigned id, e.g. to resubmit a captured snapshot
    pub fn to_input(&self) -> EmployeeIn {
        EmployeeIn {
            name: self.name.clone(),
            surname: self.surname.clone(),
            patronymic: self.patronymic.clone(),
            department_number: self.department_number,
            service_number: self.service_number,
            employment_date: self.employment_date,
            topic_name: self.topic_name.clone(),
            topic_number: self.topic_number,
            post_code: self.post_code,
            post_name: self.post_name.clone(),
            salary: self.salary.clone(),
            titles: self.titles.clone(),
        }
    }
}

/// Search filter: provided fields are combined with AND, absent fields
/// are not constrained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSearch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub department_number: Option<i64>,
    pub service_number: Option<i64>,
    pub topic_name: Option<String>,
    pub post_name: Option<String>,
    pub title_name: Option<String>,
}

impl EmployeeSearch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.patronymic.is_none()
            && self.department_number.is_none()
            && self.service_number.is_none()
            && self.topic_name.is_none()
            && self.post_name.is_none()
            && self.title_name.is_none()
    }
}

/// One validation failure: field path, human message, machine kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path to the offending field, e.g. `["salary", "currency"]`
    pub loc: Vec<String>,
    pub msg: String,
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Body of a 422 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrongDataBody {
    pub detail: Vec<FieldError>,
}
