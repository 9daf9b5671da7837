use crate::{
    auth::{hash_password, verify_password},
    error::AppError,
    models::{MessageResponse, TokenResponse, UserRequest},
    state::AppState,
    store::UserError,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Validates the credentials, rejects a taken username, then stores a bcrypt
/// digest of the password.
///
/// ## Responses:
/// - `201 Created`: `{"message": "User created successfully"}`.
/// - `400 Bad Request`: A credential rule failed, or `"User already exists"`.
/// - `422 Unprocessable Entity`: The body is not `{username, password}`.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<UserRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let UserRequest { username, password } = signup_data.into_inner();

    // Checked before hashing so a duplicate costs no bcrypt round.
    if state.users.find_by_username(&username).await?.is_some() {
        return Err(UserError::AlreadyExists.into());
    }

    let cost = state.bcrypt_cost;
    let password_hash = web::block(move || hash_password(&password, cost)).await??;
    let user = state.users.create(&username, &password_hash).await?;

    log::info!("Registered user {} (id {})", user.username, user.id);
    Ok(HttpResponse::Created().json(MessageResponse::new("User created successfully")))
}

/// Issue an access token
///
/// Exchanges a username and password for a bearer token. Unknown users and
/// wrong passwords get the same 401 after the same amount of bcrypt work.
///
/// ## Responses:
/// - `200 OK`: `{"access_token": ..., "token_type": "bearer"}`.
/// - `401 Unauthorized`: Unknown username or wrong password.
/// - `422 Unprocessable Entity`: The body is not `{username, password}`.
#[post("/token")]
pub async fn token(
    state: web::Data<AppState>,
    login_data: web::Json<UserRequest>,
) -> Result<impl Responder, AppError> {
    let UserRequest { username, password } = login_data.into_inner();

    let Some(user) = state.users.find_by_username(&username).await? else {
        // Same bcrypt work as a wrong password, so timing does not reveal the user.
        let dummy = state.dummy_hash.clone();
        web::block(move || verify_password(&password, &dummy)).await??;
        log::debug!("Token refused: unknown user");
        return Err(AppError::Unauthorized);
    };

    let digest = user.password_hash.clone();
    let password_matches = web::block(move || verify_password(&password, &digest)).await??;
    if !password_matches {
        log::debug!("Token refused: wrong password for user id {}", user.id);
        return Err(AppError::Unauthorized);
    }

    let access_token = state.tokens.issue(&user.username)?;
    log::info!("Issued access token for user id {}", user.id);
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}
