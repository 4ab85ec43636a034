use serde::Deserialize;

use crate::validation::{Field, FieldValue, Rule, Validate};

/// Body of `POST /user` and `PUT /user`. Missing fields decode to their zero
/// value and are then caught by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPayload {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_active: bool,
}

impl Validate for UserPayload {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("username", FieldValue::Text(&self.username), &[Rule::Required, Rule::Min(3)]),
            Field::new("email", FieldValue::Text(&self.email), &[Rule::Required, Rule::Email]),
            Field::new("password", FieldValue::Text(&self.password), &[Rule::Required, Rule::Min(6)]),
            Field::new("isActive", FieldValue::Bool(self.is_active), &[Rule::Required]),
        ]
    }
}
