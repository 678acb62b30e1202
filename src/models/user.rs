use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff::civil::Date;

/// Names of the persisted shape of [`User`].
///
/// The DDL lives in `migrations/`; these mirror it so that every storage
/// backend reports constraint violations with the same entity and field.
pub mod columns {
    pub const TABLE: &str = "user";
    pub const ID: &str = "id";
    pub const NATIONAL_ID: &str = "cedula";
    pub const CREATED_AT: &str = "create_at";
    pub const NATIONAL_ID_UNIQUE: &str = "user_cedula_key";
}

/// User record as persisted in the `user` table.
///
/// `id` is an integer of any size, assigned by the storage engine on
/// insert; it never changes.
/// `national_id` is unique across all records.
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: BigDecimal,
    #[diesel(column_name = cedula)]
    pub national_id: i64,
    #[diesel(column_name = create_at, deserialize_as = jiff_diesel::Date)]
    pub created_at: Date,
}

/// NewUser model for inserting new records
#[derive(Debug, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    #[diesel(column_name = cedula)]
    pub national_id: i64,
    #[diesel(column_name = create_at, serialize_as = jiff_diesel::Date)]
    pub created_at: Date,
}
