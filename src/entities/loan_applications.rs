use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loan_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub full_name: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub address: String,
    pub national_id_number: String,
    pub nid_front_url: String,
    pub nid_back_url: String,

    pub salary_amount: f64,
    pub job_type: String,
    pub bank_account_number: String,

    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,

    pub loan_amount: f64,

    /// "3" or "6"
    pub loan_duration: String,

    /// bKash, Nagad or Rocket
    pub downpayment_method: String,
    pub downpayment_screenshot_url: String,

    /// Pending, Approved, Rejected or Paid
    pub status: String,

    /// Written once at insert.
    pub emi_amount: f64,
    pub total_repayment: f64,
    pub interest_rate: f64,

    pub applied_at: String,

    /// Set when the status is written as Approved or Rejected.
    pub status_changed_at: Option<String>,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
