use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Last-known employee name and id, used to pre-fill the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeProfile {
    #[schema(example = "Ana")]
    pub employee_name: String,
    #[schema(example = "123")]
    pub employee_id: String,
}

impl EmployeeProfile {
    pub fn is_complete(&self) -> bool {
        !self.employee_name.trim().is_empty() && !self.employee_id.trim().is_empty()
    }
}
