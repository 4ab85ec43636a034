use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{Field, FieldValue, Rule, Validate};

/// A post as stored locally and as exchanged with the demo post API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub user_id: i32,
}

impl Validate for Post {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::new(
            "title",
            FieldValue::Text(&self.title),
            &[Rule::Required, Rule::Min(3)],
        )]
    }
}
