use ::std::io;
use ::std::process::ExitCode;
use clap::Parser;
use common_types_accounts::{
    Auth::{BcryptHasher, PasswordHasher},
    Config::{self, Settings},
    Error::ProvisionError,
    Provision::{provision_from_arguments, provision_interactive},
    State,
    Store::{AdminStore, PostgresAdminStore},
    Types::ProvisionOutcome,
};

/// Create an administrator account for the reservation app.
///
/// Run without arguments to be prompted for the email and password.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Email address of the admin account
    #[arg(short, long)]
    email: Option<String>,

    /// Password, at least 4 characters; only the first 72 bytes are used
    #[arg(short, long)]
    password: Option<String>,

    /// Overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

// Exit codes: 0 success, 1 bad operator input, 2 database or hashing failure
const EXIT_STARTUP_FAILURE: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
            .with_max_level(Config::log_level())
            .with_target(false)
            .without_time()
            .with_writer(io::stderr)
            .init();

    let mut settings = Settings::from_env();
    if let Some(url) = &args.database_url {
        tracing::info!("Using database URL from the command line");
        settings.database_url = url.clone();
    }

    let pool = match State::make_pool(&settings) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!("Failed to set up Postgres connection pool, {err}");
            eprintln!("✗ Could not set up the database connection: {err}");
            return ExitCode::from(EXIT_STARTUP_FAILURE);
        }
    };
    let store = PostgresAdminStore::new(pool);
    let hasher = BcryptHasher::new(settings.hash_cost);

    let result = run(&args, &hasher, &store).await;
    ExitCode::from(report(&result))
}

impl Args {
    // Any provisioning flag switches off the prompts; a flag left out is then
    // reported by the validator like an empty one.
    fn is_interactive(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

async fn run<H, S>(args: &Args, hasher: &H, store: &S) -> Result<ProvisionOutcome, ProvisionError>
where
    H: PasswordHasher + ?Sized,
    S: AdminStore + ?Sized,
{
    if args.is_interactive() {
        println!("{}", "=".repeat(50));
        println!("Create admin account");
        println!("{}", "=".repeat(50));
        println!();
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        return provision_interactive(&mut input, &mut output, hasher, store).await;
    }

    println!("Creating admin account...");
    if let Some(email) = &args.email {
        println!("Email: {}", email.trim());
    }
    provision_from_arguments(args.email.as_deref(), args.password.as_deref(), hasher, store).await
}

fn report(result: &Result<ProvisionOutcome, ProvisionError>) -> u8 {
    for line in summary(result) {
        match result {
            Ok(_) => println!("{line}"),
            Err(_) => eprintln!("{line}"),
        }
    }
    match result {
        Ok(_) => 0,
        Err(err) => {
            tracing::error!("Failed to provision admin account, {err}");
            err.exit_code()
        }
    }
}

fn summary(result: &Result<ProvisionOutcome, ProvisionError>) -> Vec<String> {
    match result {
        Ok(ProvisionOutcome::Created(record)) => vec![
            format!("✓ Created admin account {}", record.email),
            String::new(),
            "Admin account setup complete.".to_owned(),
        ],
        Ok(ProvisionOutcome::Promoted(record)) => vec![
            format!("✓ Promoted existing user {} to admin", record.email),
            String::new(),
            "Admin account setup complete.".to_owned(),
        ],
        Err(err) => vec![format!("✗ {err}")],
    }
}
