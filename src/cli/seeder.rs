use std::time::Instant;

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use sqlx::PgPool;
use uuid::Uuid;

use shoky_models::Role;

/// Every seeded member gets an address on this domain, which is how
/// [`clear_seeded_members`] finds them again.
pub const SEED_EMAIL_DOMAIN: &str = "seed.shoky.test";
pub const SEED_PASSWORD: &str = "password123";

pub struct MemberSeed {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub department: &'static str,
    pub phone: String,
    pub hire_date: chrono::NaiveDate,
}

fn department(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "Administration",
        Role::HrAdmin => "Human Resources",
        Role::SocialMediaAdmin => "Marketing",
        Role::Developer => "Engineering",
    }
}

pub fn generate_members(per_role: usize) -> Vec<MemberSeed> {
    let today = Utc::now().date_naive();

    Role::ALL
        .into_iter()
        .flat_map(|role| (0..per_role).map(move |_| role))
        .map(|role| {
            let full_name: String = Name().fake();
            let tag = Uuid::new_v4().simple().to_string();
            let days_employed: i64 = (30..2000).fake();

            MemberSeed {
                email: format!("{}.{}@{}", role.as_str(), &tag[..12], SEED_EMAIL_DOMAIN),
                full_name,
                role,
                department: department(role),
                phone: PhoneNumber().fake(),
                hire_date: today - Duration::days(days_employed),
            }
        })
        .collect()
}

/// Seeds `per_role` fake members for every role in one transaction.
///
/// All seeded members share [`SEED_PASSWORD`], hashed once at a low bcrypt
/// cost.
pub async fn seed_members(db: &PgPool, per_role: usize) -> Result<usize, Box<dyn std::error::Error>> {
    let start = Instant::now();
    println!("🌱 Seeding {} members per role...", per_role);

    let password_hash = bcrypt::hash(SEED_PASSWORD, 4)?;
    let members = generate_members(per_role);

    let mut tx = db.begin().await?;
    for member in &members {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id",
        )
        .bind(&member.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO profiles (id, full_name, email, role, department, phone, hire_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user_id)
        .bind(&member.full_name)
        .bind(&member.email)
        .bind(member.role)
        .bind(member.department)
        .bind(&member.phone)
        .bind(member.hire_date)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    println!(
        "✅ Seeded {} members in {:?}. Password for all: {}",
        members.len(),
        start.elapsed(),
        SEED_PASSWORD
    );
    Ok(members.len())
}

/// Removes every seeded member. Sessions and profiles cascade.
pub async fn clear_seeded_members(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?;

    println!("🧹 Removed {} seeded members", result.rows_affected());
    Ok(result.rows_affected())
}
