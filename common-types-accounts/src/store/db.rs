use chrono::{DateTime, Utc};
use diesel::prelude::*;
use crate::Schema::{hooked_sql_types::UserRole, users};

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
pub struct PromoteUser<'a> {
    pub role: UserRole,
    pub password_hash: &'a str,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExistingUser {
    pub id: i32,
    pub role: UserRole,
}
