#[allow(non_snake_case)]
pub mod Admin {
    use ::std::fmt;
    use chrono::{DateTime, Utc};
    use diesel::prelude::*;
    use garde::Validate;
    use db_schema::{hooked_sql_types::UserRole, users};

    /// Credentials for a single administrator, built from operator input.
    ///
    /// `password` holds the plaintext bytes that will be handed to the hasher,
    /// already cut down to the bcrypt input limit once validated.
    #[derive(Clone, Validate)]
    pub struct AdminCredentialRequest {
        #[garde(email, length(max=255))]
        pub email: String,
        #[garde(skip)]
        pub password: Vec<u8>,
    }

    impl fmt::Debug for AdminCredentialRequest {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.debug_struct("AdminCredentialRequest")
                .field("email", &self.email)
                .field("password", &"<redacted>")
                .finish()
        }
    }

    #[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
    #[diesel(table_name = users)]
    #[diesel(check_for_backend(diesel::pg::Pg))]
    pub struct AdminRecord {
        pub id: i32,
        pub email: String,
        pub role: UserRole,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum ProvisionOutcome {
        Created(AdminRecord),
        // An existing non-admin user was given the admin role and a new password
        Promoted(AdminRecord),
    }

    impl ProvisionOutcome {
        pub fn record(&self) -> &AdminRecord {
            match self {
                ProvisionOutcome::Created(record) | ProvisionOutcome::Promoted(record) => record,
            }
        }
    }

}
