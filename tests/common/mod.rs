use actix_web::{
    App, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use anyhow::Result;
use sqlx::SqlitePool;
use tempfile::TempDir;

use payrolld::database::models::{LoginInput, User};
use payrolld::database::repositories::{
    AccessFlagRepository, AccessGroupRepository, SettingsRepository, UserRepository,
};
use payrolld::database::{init_database, seed};
use payrolld::handlers::shared::ApiResponse;
use payrolld::routes;
use payrolld::services::{AuthService, HolidayService, two_factor};
use payrolld::{AppState, Config};

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Temp-file backed SQLite database, dropped with the tempdir.
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        Ok(TestDb {
            pool,
            _temp_dir: temp_dir,
        })
    }
}

pub struct TestApp {
    pub db: TestDb,
    pub config: Config,
    pub users: UserRepository,
    pub groups: AccessGroupRepository,
    pub flags: AccessFlagRepository,
    pub settings: SettingsRepository,
    pub holidays: HolidayService,
    pub auth: AuthService,
}

impl TestApp {
    /// Fresh database with the default groups and flags seeded.
    pub async fn new() -> Result<Self> {
        let db = TestDb::new().await?;

        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            token_ttl_minutes: 30,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            holiday_api_url: "http://localhost:1".to_string(),
            data_dir: "data".to_string(),
        };

        let users = UserRepository::new(db.pool.clone());
        let groups = AccessGroupRepository::new(db.pool.clone());
        let flags = AccessFlagRepository::new(db.pool.clone());
        let settings = SettingsRepository::new(db.pool.clone());
        let auth = AuthService::new(users.clone(), settings.clone(), config.clone());
        let holidays = HolidayService::new(config.holiday_api_url.clone());

        seed::ensure_defaults(&groups, &flags).await?;

        Ok(TestApp {
            db,
            config,
            users,
            groups,
            flags,
            settings,
            holidays,
            auth,
        })
    }

    /// Application instance wired the way `main` wires it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(AppState {
                auth_service: self.auth.clone(),
            }))
            .app_data(web::Data::new(self.db.pool.clone()))
            .app_data(web::Data::new(self.users.clone()))
            .app_data(web::Data::new(self.groups.clone()))
            .app_data(web::Data::new(self.flags.clone()))
            .app_data(web::Data::new(self.settings.clone()))
            .app_data(web::Data::new(self.holidays.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let response =
                    HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid Data"));
                actix_web::error::InternalError::from_response(err, response).into()
            }))
            .configure(routes::configure)
    }

    /// Creates a user in the named seeded group with [`TEST_PASSWORD`].
    pub async fn create_user(&self, username: &str, group_tag: &str) -> Result<User> {
        let group = self
            .groups
            .find_by_tag(group_tag)
            .await?
            .expect("seeded group missing");

        let password_hash = bcrypt::hash(TEST_PASSWORD, bcrypt::DEFAULT_COST)?;
        let enrollment = two_factor::enroll(username)?;

        self.users
            .create(&User::new(
                username.to_string(),
                format!("{}@localhost", username),
                password_hash,
                "Tester".to_string(),
                "User".to_string(),
                group.id,
                enrollment.secret,
            ))
            .await
    }

    /// Logs the user in through the auth service and returns a bearer token.
    pub async fn login_token(&self, user: &User) -> Result<String> {
        let code = two_factor::current_code(&user.totp_secret)?;
        let (_, grant) = self
            .auth
            .authenticate(&LoginInput {
                login: user.username.clone(),
                password: TEST_PASSWORD.to_string(),
                token: code,
            })
            .await
            .map_err(|e| anyhow::anyhow!("login failed: {}", e))?;

        Ok(grant.token)
    }
}
