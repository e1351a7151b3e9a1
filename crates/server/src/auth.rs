//! Signup, login, and token refresh.
//!
//! Tokens are an HS256 access/refresh pair. The refresh token only ever
//! buys a new access token; it never opens a protected route directly.

use api_types::user::{AccessToken, LoginUser, SignupUser, TokenPair, TokenRefresh};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
}

pub fn issue_token(
    user_id: Uuid,
    token_type: &str,
    ttl: chrono::Duration,
    secret: &str,
) -> Result<String, ServerError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
        token_type: token_type.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| ServerError::Generic(err.to_string()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupUser>,
) -> Result<StatusCode, ServerError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "email and password are required".to_string(),
        ));
    }

    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(payload.email.clone()))
        .one(&state.db)
        .await
        .map_err(|err| ServerError::Engine(err.into()))?;
    if existing.is_some() {
        return Err(ServerError::Generic("email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    let now = Utc::now();
    let user = users::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        email: ActiveValue::Set(payload.email),
        name: ActiveValue::Set(payload.name),
        password_hash: ActiveValue::Set(password_hash),
        role: ActiveValue::Set(users::UserRole::User.as_str().to_string()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    };
    users::Entity::insert(user)
        .exec(&state.db)
        .await
        .map_err(|err| ServerError::Engine(err.into()))?;

    Ok(StatusCode::CREATED)
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginUser>,
) -> Result<Json<TokenPair>, ServerError> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(payload.email))
        .one(&state.db)
        .await
        .map_err(|err| ServerError::Engine(err.into()))?
        .ok_or(ServerError::Unauthorized)?;

    let verified = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|_| ServerError::Unauthorized)?;
    if !verified {
        return Err(ServerError::Unauthorized);
    }

    let access = issue_token(
        user.id,
        TOKEN_TYPE_ACCESS,
        state.auth.access_ttl,
        &state.auth.secret,
    )?;
    let refresh = issue_token(
        user.id,
        TOKEN_TYPE_REFRESH,
        state.auth.refresh_ttl,
        &state.auth.secret,
    )?;

    Ok(Json(TokenPair { access, refresh }))
}

pub async fn refresh(
    State(state): State<ServerState>,
    Json(payload): Json<TokenRefresh>,
) -> Result<Json<AccessToken>, ServerError> {
    let claims =
        decode_token(&payload.refresh, &state.auth.secret).map_err(|_| ServerError::Unauthorized)?;
    if claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(ServerError::Unauthorized);
    }

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ServerError::Unauthorized)?;
    let user = users::Entity::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|err| ServerError::Engine(err.into()))?
        .ok_or(ServerError::Unauthorized)?;

    let access = issue_token(
        user.id,
        TOKEN_TYPE_ACCESS,
        state.auth.access_ttl,
        &state.auth.secret,
    )?;
    Ok(Json(AccessToken { access }))
}
