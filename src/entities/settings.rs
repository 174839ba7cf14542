use sea_orm::entity::prelude::*;

/// Singleton row; the repository always uses `SINGLETON_ID`.
pub const SINGLETON_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub loan_min: f64,

    pub loan_max: f64,

    pub bkash_number: String,

    pub nagad_number: String,

    pub rocket_number: String,

    pub interest_rate: f64,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
