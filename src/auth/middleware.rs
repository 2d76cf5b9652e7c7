use crate::auth::token::TokenAuthenticator;
use crate::error::ApiError;
use actix_web::{dev::ServiceRequest, web, Error, HttpMessage};
use actix_web_httpauth::extractors::bearer::BearerAuth;

/// Bearer-token gate for protected scopes.
///
/// On success the verified [`Claims`](crate::auth::Claims) are stored in the
/// request extensions, where handlers pick them up with `web::ReqData`.
pub async fn validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(authenticator) = req.app_data::<web::Data<TokenAuthenticator>>().cloned() else {
        tracing::error!("token authenticator is not registered as app data");
        return Err((
            ApiError::Unexpected(anyhow::anyhow!("authenticator unavailable")).into(),
            req,
        ));
    };

    match authenticator.verify(credentials.token()) {
        Ok(claims) => {
            tracing::debug!(subject = %claims.sub, path = %req.path(), "bearer token accepted");
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(e) => {
            tracing::info!(reason = %e, path = %req.path(), "bearer token rejected");
            Err((ApiError::Unauthorized.into(), req))
        }
    }
}
