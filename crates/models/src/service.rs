use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, version};

pub const NAME_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Version }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Version => Entity::has_many(version::Entity).into(),
        }
    }
}

impl Related<version::Entity> for Entity {
    fn to() -> RelationDef { Relation::Version.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("service name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("service name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

/// Validated insert payload; `id` is left to the store, timestamps are server-assigned.
pub fn new_active_model(name: &str, description: &str) -> Result<ActiveModel, errors::ModelError> {
    validate_name(name)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    Ok(ActiveModel {
        id: NotSet,
        name: Set(name.trim().to_string()),
        description: Set(description.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    })
}
