pub mod sql_types {
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "userrole"))]
    pub struct UserRoleMapping;
}

pub mod hooked_sql_types {
    // Labels are stored by name, so the enum values in Postgres are ADMIN and USER
    #[derive(Debug, PartialEq, Eq, Clone, Copy, diesel_derive_enum::DbEnum)]
    #[ExistingTypePath = "crate::sql_types::UserRoleMapping"]
    #[DbValueStyle = "SCREAMING_SNAKE_CASE"]
    pub enum UserRole {
        Admin,
        User,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::UserRoleMapping;

    users (id) {
        id -> Int4,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
        role -> UserRoleMapping,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
