use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use shoky::cli::seeder::{clear_seeded_members, seed_members};
use shoky::cli::{create_member, open_dashboard, set_role, sign_in_and_settle};
use shoky_access::{badge, nav_entries, presentation};
use shoky_auth::AuthState;
use shoky_config::{JwtConfig, SessionConfig};
use shoky_db::{PgPool, init_db_pool, run_migrations};
use shoky_models::{CreateMemberDto, LoginRequest, Role};

#[derive(Parser)]
#[command(name = "shoky-cli")]
#[command(about = "Shoky Hub CLI - Administrative tools for Shoky Hub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a member account with a profile
    CreateUser {
        /// Full name shown on the role badge
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// super_admin, hr_admin, social_media_admin or developer
        #[arg(short = 'r', long, default_value = "developer")]
        role: Role,
    },
    /// Change the role of an existing member
    SetRole {
        #[arg(short = 'e', long)]
        email: String,

        #[arg(short = 'r', long)]
        role: Role,
    },
    /// Seed the database with fake members of every role
    Seed {
        /// Number of members to create per role
        #[arg(long, default_value = "5")]
        per_role: usize,
    },
    /// Remove all seeded members
    ClearSeed,
    /// Sign in and print the dashboard a member would see
    Dashboard {
        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = init_db_pool().await;
    if let Err(e) = run_migrations(&pool).await {
        eprintln!("❌ Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    match cli.command {
        Commands::CreateUser {
            full_name,
            email,
            password,
            role,
        } => handle_create_user(&pool, full_name, email, password, role).await,
        Commands::SetRole { email, role } => handle_set_role(&pool, &email, role).await,
        Commands::Seed { per_role } => handle_seed(&pool, per_role).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
        Commands::Dashboard { email, password } => handle_dashboard(&pool, email, password).await,
    }
}

fn prompt_text(prompt: &str) -> String {
    match Input::new().with_prompt(prompt).interact_text() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", prompt.to_lowercase(), e);
            std::process::exit(1);
        }
    }
}

fn prompt_password(confirm: bool) -> String {
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords don't match");
    }
    match prompt.interact() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("❌ Failed to read password: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_create_user(
    pool: &PgPool,
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Role,
) {
    let dto = CreateMemberDto {
        full_name: full_name.unwrap_or_else(|| prompt_text("Full name")),
        email: email.unwrap_or_else(|| prompt_text("Email address")),
        password: password.unwrap_or_else(|| prompt_password(true)),
        role,
    };

    match create_member(pool, dto).await {
        Ok(profile) => {
            println!("\n✅ Member created successfully!");
            println!("   Email: {}", profile.email);
            println!("   Name: {}", profile.full_name);
            println!("   Role: {}", presentation(profile.role).label);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating member: {}", e.error);
            std::process::exit(1);
        }
    }
}

async fn handle_set_role(pool: &PgPool, email: &str, role: Role) {
    match set_role(pool, email, role).await {
        Ok(profile) => {
            println!("✅ {} is now {}", profile.email, presentation(profile.role).label);
        }
        Err(e) => {
            eprintln!("❌ Error setting role: {}", e.error);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool, per_role: usize) {
    if let Err(e) = seed_members(pool, per_role).await {
        eprintln!("❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = clear_seeded_members(pool).await {
        eprintln!("❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}

async fn handle_dashboard(pool: &PgPool, email: Option<String>, password: Option<String>) {
    let credentials = LoginRequest {
        email: email.unwrap_or_else(|| prompt_text("Email address")),
        password: password.unwrap_or_else(|| prompt_password(false)),
    };

    let ctx = open_dashboard(pool, JwtConfig::from_env(), SessionConfig::from_env()).await;

    let state = match sign_in_and_settle(&ctx, &credentials).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Sign-in failed: {}", e);
            std::process::exit(1);
        }
    };

    match &state {
        AuthState::Authenticated { profile, .. } => {
            let badge = badge(profile);
            println!("\n👤 {} ({})", badge.full_name, badge.label);
            println!("\nNavigation:");
            for entry in nav_entries(&state, "/dashboard") {
                let marker = if entry.active { "▶" } else { " " };
                println!("  {} {:<22} {}", marker, entry.title, entry.href);
            }
        }
        AuthState::ProfileMissing { reason, .. } => {
            println!("\n⚠️  Signed in, but no usable profile ({})", reason.as_str());
        }
        other => {
            println!("\n⚠️  Unexpected state: {}", other.status().as_str());
        }
    }

    if let Err(e) = ctx.sign_out().await {
        eprintln!("❌ Sign-out failed: {}", e);
    }
    println!("\nSigned out: {}", ctx.snapshot().status().as_str());
    ctx.shutdown();
}
