use serde::{Deserialize, Serialize};

use crate::validation::{Field, FieldValue, Rule, Validate};

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("username", FieldValue::Text(&self.username), &[Rule::Required, Rule::Min(3)]),
            Field::new("password", FieldValue::Text(&self.password), &[Rule::Required, Rule::Min(6)]),
        ]
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
