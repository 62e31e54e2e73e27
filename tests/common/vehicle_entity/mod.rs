use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    // Foreign key to customer
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer_entity::Entity",
        from = "Column::CustomerId",
        to = "super::customer_entity::Column::Id"
    )]
    Customer,

    #[sea_orm(has_many = "super::vehicle_part_entity::Entity")]
    VehicleParts,
}

impl Related<super::customer_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::vehicle_part_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleParts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
