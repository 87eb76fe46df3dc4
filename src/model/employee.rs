use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::validation::validate_employee_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP-001",
        "full_name": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "created_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "2024-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "EMP-001", value_type = String)]
    #[validate(custom = "validate_employee_id")]
    #[serde(default)]
    pub employee_id: String,

    #[schema(example = "John Doe", value_type = String)]
    #[validate(length(min = 2, max = 100, message = "Full name must be between 2 and 100 characters."))]
    #[serde(default)]
    pub full_name: String,

    #[schema(example = "john@email.com", format = "email", value_type = String)]
    #[validate(email(message = "Please provide a valid email address."))]
    #[serde(default)]
    pub email: String,

    #[schema(example = "Engineering", value_type = String)]
    #[validate(length(min = 1, message = "Department is required."))]
    #[serde(default)]
    pub department: String,
}

impl NewEmployee {
    /// Trims every field, upper-cases the id and lower-cases the email.
    pub fn normalized(&self) -> Self {
        Self {
            employee_id: self.employee_id.trim().to_uppercase(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            department: self.department.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of id, name or email
    pub search: Option<String>,
    /// Exact department name
    pub department: Option<String>,
}

impl EmployeeFilter {
    /// Blank values mean "no filter".
    pub fn search_term(&self) -> Option<String> {
        non_blank(&self.search).map(str::to_lowercase)
    }

    pub fn department_name(&self) -> Option<&str> {
        non_blank(&self.department)
    }

    /// Unicode case-insensitive substring match of the search term against
    /// id, name or email. Always true without a search term.
    pub fn matches(&self, employee: &Employee) -> bool {
        let Some(term) = self.search_term() else {
            return true;
        };
        [&employee.employee_id, &employee.full_name, &employee.email]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    /// Headcount of the whole directory
    #[schema(example = 10)]
    pub total: usize,
    /// Rows that matched the filter
    #[schema(example = 3)]
    pub filtered: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedEmployee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = 12)]
    pub attendance_removed: u64,
}
