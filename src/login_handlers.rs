use crate::{auth::TokenAuthenticator, error::ApiError, models::LoginRequest};
use actix_web::{post, web, HttpResponse};

/// Exchanges a username and password for a bearer token.
///
/// The token is returned verbatim as the response body.
#[post("/authenticate")]
pub async fn authenticate(
    data: web::Json<LoginRequest>,
    authenticator: web::Data<TokenAuthenticator>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest {
        user_name,
        password,
    } = data.into_inner();

    // bcrypt verification blocks, run it on the blocking pool.
    let token = web::block(move || authenticator.authenticate(&user_name, &password))
        .await
        .map_err(|e| ApiError::Unexpected(anyhow::anyhow!("login task failed: {}", e)))??;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(token))
}
