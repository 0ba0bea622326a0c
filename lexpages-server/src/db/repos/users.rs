//! User accounts, created from the command line only

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::PgPool;

use lexpages_core::ValidationError;

use super::DbError;

const MIN_LOGIN_LEN: usize = 3;

/// Account to create
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

impl NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.login.trim().chars().count() < MIN_LOGIN_LEN {
            return Err(ValidationError::TooShort {
                field: "login",
                min: MIN_LOGIN_LEN,
            });
        }
        if self.password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok(())
    }
}

/// Argon2id hash of `password` in PHC format, with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, DbError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbError::Credentials {
            reason: format!("failed to hash password: {e}"),
        })
}

/// Whether `password` matches the PHC string `hash`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, DbError> {
    let parsed = PasswordHash::new(hash).map_err(|e| DbError::Credentials {
        reason: format!("invalid password hash: {e}"),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &NewUser) -> Result<i32, DbError> {
        user.validate()?;
        let hash = hash_password(&user.password)?;
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (login, password_hash, name, email, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.login.trim())
        .bind(&hash)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.role)
        .fetch_one(self.pool)
        .await?;
        tracing::info!(user_id = id, login = %user.login, role = %user.role, "user created");
        Ok(id)
    }

    /// Whether `password` is the one stored for `login`.
    pub async fn check_password(&self, login: &str, password: &str) -> Result<bool, DbError> {
        let hash: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE login = $1")
            .bind(login.trim())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", login.trim()))?;
        verify_password(password, &hash)
    }

    /// Create `admin` with `password` unless any user exists. Returns
    /// whether the account was created.
    pub async fn seed_admin(&self, password: &str, domain: &str) -> Result<bool, DbError> {
        let any: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users)")
            .fetch_one(self.pool)
            .await?;
        if any {
            return Ok(false);
        }
        self.create(&NewUser {
            login: "admin".to_owned(),
            name: "Administrator".to_owned(),
            email: format!("admin@{domain}"),
            role: "admin".to_owned(),
            password: password.to_owned(),
        })
        .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_phc_and_verifies() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same", &second).unwrap());
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(matches!(
            verify_password("secret", "5ebe2294ecd0e0f08eab7690d2a6ee69"),
            Err(DbError::Credentials { .. })
        ));
    }

    #[test]
    fn short_login_is_rejected() {
        let user = NewUser {
            login: "ab".into(),
            name: String::new(),
            email: String::new(),
            role: "admin".into(),
            password: "x".into(),
        };
        assert_eq!(
            user.validate(),
            Err(ValidationError::TooShort { field: "login", min: 3 })
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seeded_admin_password_checks_out() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool_with_options(&url, 2).await.unwrap();
        crate::db::migrations::reset(&pool).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let repo = UserRepo::new(&pool);
        assert!(repo.seed_admin("s3cret", "jurist.example").await.unwrap());
        assert!(!repo.seed_admin("other", "jurist.example").await.unwrap());

        assert!(repo.check_password("admin", "s3cret").await.unwrap());
        assert!(!repo.check_password("admin", "other").await.unwrap());
        assert!(matches!(
            repo.check_password("nobody", "s3cret").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
