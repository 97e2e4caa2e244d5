use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub phone: String, pub name: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// User as returned by the API; the credential is never included.
#[derive(ToSchema)]
pub struct PublicUserDoc {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    /// `UNVERIFIED` or `VERIFIED`
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// `password` is accepted but ignored; use the password endpoint.
#[derive(ToSchema)]
pub struct UserPatchDoc {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema)]
pub struct ChangePasswordDoc { pub password: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::change_password,
        crate::routes::users::confirm_email,
        crate::routes::users::confirm_phone,
        crate::routes::users::delete,
        crate::routes::users::private_files,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            PublicUserDoc,
            UserPatchDoc,
            ChangePasswordDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "files")
    )
)]
pub struct ApiDoc;
