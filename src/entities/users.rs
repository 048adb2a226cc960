use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account discriminator, stored and sent on the wire with its Portuguese name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AccountKind {
    #[sea_orm(string_value = "paciente")]
    #[serde(rename = "paciente")]
    Patient,

    #[sea_orm(string_value = "profissional")]
    #[serde(rename = "profissional")]
    Professional,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Patients only
    #[sea_orm(unique)]
    pub username: Option<String>,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub kind: AccountKind,

    pub full_name: Option<String>,

    /// Professional registration (CRP)
    #[sea_orm(unique)]
    pub license_number: Option<String>,

    pub age: Option<i32>,

    pub sex: Option<String>,

    pub practice_area: Option<String>,

    pub contact: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// AI-written summary of the screening questionnaire
    #[sea_orm(column_type = "Text", nullable)]
    pub assessment_summary: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
