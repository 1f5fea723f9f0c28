use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, service};

pub const LABEL_MAX_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "version")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: i32,
    pub version: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_label(label: &str) -> Result<(), errors::ModelError> {
    if label.trim().is_empty() {
        return Err(errors::ModelError::Validation("version label required".into()));
    }
    if label.chars().count() > LABEL_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("version label longer than {LABEL_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn new_active_model(
    service_id: i32,
    label: &str,
    description: &str,
    is_active: bool,
) -> Result<ActiveModel, errors::ModelError> {
    validate_label(label)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    Ok(ActiveModel {
        id: NotSet,
        service_id: Set(service_id),
        version: Set(label.trim().to_string()),
        description: Set(description.to_string()),
        is_active: Set(is_active),
        created_at: Set(now),
        updated_at: Set(now),
    })
}
