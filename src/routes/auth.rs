use crate::{
    auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::AppError,
    models::NewUser,
    response::Envelope,
    state::AppState,
};
use actix_web::{http::StatusCode, post, web, HttpResponse};
use validator::Validate;

/// Register a new user
///
/// Creates an account and returns it (without the password hash). Duplicate emails are
/// caught by the store's uniqueness constraint and answered with 409.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register_data.validate()?;
    let request = register_data.into_inner();

    let password_hash = state.hasher.hash(&request.password)?;

    let user = state
        .store
        .create_user(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
        })
        .await?;

    log::info!("registered user {} <{}>", user.id, user.email);
    Ok(Envelope::respond(
        StatusCode::CREATED,
        "User registered successfully",
        user,
    ))
}

/// Login user
///
/// Checks the credentials and returns a token valid for one hour.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .store
        .find_user_by_email(&login_data.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !state.hasher.verify(&login_data.password, &user.password_hash) {
        log::debug!("failed login for user {}", user.id);
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = state.tokens.issue(user.id).map_err(|e| {
        log::error!("Failed to issue token for user {}: {}", user.id, e);
        AppError::InternalServerError("Error generating token".into())
    })?;

    log::info!("user {} logged in", user.id);
    Ok(Envelope::respond(
        StatusCode::OK,
        "Logged in successfully",
        LoginResponse { token },
    ))
}
