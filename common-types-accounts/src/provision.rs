use ::std::io::{BufRead, Write};

use crate::{
    Auth::{truncate_password, PasswordHasher},
    Error::ProvisionError,
    Store::AdminStore,
    Types::{AdminCredentialRequest, ProvisionOutcome},
};

mod prompt;
mod validate;

pub use validate::{require_email, require_password, validate};

// Provisioning an admin account
//
// 1. Validate operator input (email present, password at least 4 characters)
// 2. Truncate the password to the bcrypt input limit
// 3. Hash password using bcrypt algorithm
// 4. Hand email and hash to the store
//
// Validation failures stop at (1) and never reach the hasher or the store.
// Store failures are passed back untouched.
#[tracing::instrument(skip_all, fields(email=%email.unwrap_or_default()))]
pub async fn provision<H, S>(email: Option<&str>, password: Option<&str>, hasher: &H, store: &S) -> Result<ProvisionOutcome, ProvisionError>
where
    H: PasswordHasher + ?Sized,
    S: AdminStore + ?Sized,
{
    tracing::info!("Processing admin account request");
    let request = validate(email, password).map_err(|err| {
        tracing::info!("Rejected request, {err}");
        err
    })?;
    submit(request, hasher, store).await
}

/// Hashes an already validated request and stores it.
pub async fn submit<H, S>(request: AdminCredentialRequest, hasher: &H, store: &S) -> Result<ProvisionOutcome, ProvisionError>
where
    H: PasswordHasher + ?Sized,
    S: AdminStore + ?Sized,
{
    tracing::info!("Hashing password");
    let hashed = hasher.hash(&request.password).map_err(|err| {
        tracing::error!("Failed to hash password, {err}");
        err
    })?;

    let outcome = store.create_admin(&request.email, &hashed).await.map_err(|err| {
        tracing::warn!("Store rejected admin account, {err}");
        err
    })?;
    tracing::info!("Successfully provisioned admin account");
    Ok(outcome)
}

/// Non-interactive entry point, fed from `--email` and `--password`.
///
/// A flag that was left out arrives as `None` and is reported as missing input.
#[tracing::instrument(skip(password, hasher, store))]
pub async fn provision_from_arguments<H, S>(email: Option<&str>, password: Option<&str>, hasher: &H, store: &S) -> Result<ProvisionOutcome, ProvisionError>
where
    H: PasswordHasher + ?Sized,
    S: AdminStore + ?Sized,
{
    provision(email.map(str::trim), password.map(str::trim), hasher, store).await
}

/// Prompts for email, password and a confirmation of the password.
///
/// Input is echoed. Each answer is checked as soon as it is read, so a
/// missing email never leads to a password prompt. The confirmation is
/// compared after both values are cut to the bcrypt limit.
#[tracing::instrument(skip_all)]
pub async fn provision_interactive<R, W, H, S>(input: &mut R, output: &mut W, hasher: &H, store: &S) -> Result<ProvisionOutcome, ProvisionError>
where
    R: BufRead,
    W: Write,
    H: PasswordHasher + ?Sized,
    S: AdminStore + ?Sized,
{
    let email = prompt::read_line(input, output, "Email address: ")?;
    let email = require_email(email.as_deref())?;

    let password = prompt::read_line(input, output, "Password (4 digits is fine): ")?;
    let password = require_password(password.as_deref())?;

    let confirmation = prompt::read_line(input, output, "Confirm password: ")?
        .ok_or(ProvisionError::MissingInput("password confirmation"))?;
    if truncate_password(password.as_bytes()) != truncate_password(confirmation.as_bytes()) {
        tracing::info!("Password confirmation did not match");
        return Err(ProvisionError::PasswordMismatch);
    }

    writeln!(output)?;
    writeln!(output, "Creating admin account...")?;
    provision(Some(email), Some(password), hasher, store).await
}
