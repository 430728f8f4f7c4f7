use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::db::users::get_user_by_id;
use crate::error::ApiError;
use crate::models::users;

/// The authenticated principal: a `users` row carrying identity and role.
///
/// Extracting this in a handler is what makes a route JWT-protected.
pub struct AuthenticatedUser(pub users::Model);

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    ApiError::Unauthenticated("Missing Authorization header".to_string())
                })?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                ApiError::Unauthenticated(
                    "Authorization header must be: Bearer <token>".to_string(),
                )
            })?;

            // 2. Validate against the shared HS256 secret.
            let secret = req.app_data::<web::Data<JwtSecret>>().ok_or_else(|| {
                ApiError::Dependency("JWT secret not configured".to_string())
            })?;

            let claims = jwt::validate_token(token, &secret.0)
                .map_err(|e| ApiError::Unauthenticated(format!("Invalid token: {e}")))?;

            let user_id = claims.user_id().map_err(ApiError::Unauthenticated)?;

            // 3. Resolve the principal. A valid token for a deleted user is
            //    still an authentication failure.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ApiError::Dependency("Database not configured".to_string()))?;

            let user = get_user_by_id(db.get_ref(), user_id)
                .await?
                .ok_or_else(|| ApiError::Unauthenticated("Unknown principal".to_string()))?;

            if user.is_banned {
                return Err(ApiError::Forbidden("This account is banned".to_string()));
            }

            Ok(AuthenticatedUser(user))
        })
    }
}
