use crate::{
    auth::Claims,
    db::CommandRepo,
    error::ApiError,
    models::{CommandReadDto, CommandWriteDto},
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse};
use validator::Validate;

#[get("")]
pub async fn list_commands(repo: web::Data<dyn CommandRepo>) -> HttpResponse {
    let commands: Vec<CommandReadDto> = repo
        .list()
        .await
        .into_iter()
        .map(CommandReadDto::from)
        .collect();
    HttpResponse::Ok().json(commands)
}

#[get("/{id}")]
pub async fn get_command(
    path: web::Path<i32>,
    repo: web::Data<dyn CommandRepo>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let command = repo.get(id).await.ok_or(ApiError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(CommandReadDto::from(command)))
}

#[post("")]
pub async fn create_command(
    body: web::Json<CommandWriteDto>,
    repo: web::Data<dyn CommandRepo>,
    user: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let created = repo.create(body).await;
    tracing::info!(id = created.id, subject = %user.sub, "command created");

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/commands/{}", created.id)))
        .json(CommandReadDto::from(created)))
}

#[put("/{id}")]
pub async fn update_command(
    path: web::Path<i32>,
    body: web::Json<CommandWriteDto>,
    repo: web::Data<dyn CommandRepo>,
    user: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    if !repo.update(id, body).await {
        return Err(ApiError::NotFound(id));
    }
    tracing::info!(id, subject = %user.sub, "command updated");
    Ok(HttpResponse::NoContent().finish())
}

#[delete("/{id}")]
pub async fn delete_command(
    path: web::Path<i32>,
    repo: web::Data<dyn CommandRepo>,
    user: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !repo.delete(id).await {
        return Err(ApiError::NotFound(id));
    }
    tracing::info!(id, subject = %user.sub, "command deleted");
    Ok(HttpResponse::NoContent().finish())
}
