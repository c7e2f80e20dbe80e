use actix_web::{
    HttpResponse, delete, get, post, put,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::auth::CallerIdentity;
use super::dto::ApiResponse;
use super::models::{CreatePekerjaanRequest, UpdatePekerjaanRequest};
use super::query::{normalize, RawListParams};
use super::service::{PekerjaanService, ServiceError};

#[get("")]
async fn list_pekerjaan(
    service: Data<PekerjaanService>,
    _caller: CallerIdentity,
    params: Query<RawListParams>,
) -> Result<HttpResponse, ServiceError> {
    let normalized = normalize(&params);
    let rows = service.list(&normalized.query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(rows, normalized.meta())))
}

#[get("/trash")]
async fn list_trash(
    service: Data<PekerjaanService>,
    caller: CallerIdentity,
) -> Result<HttpResponse, ServiceError> {
    let rows = service.list_trash(&caller).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(rows)))
}

#[get("/trash/{id}")]
async fn get_from_trash(
    service: Data<PekerjaanService>,
    _caller: CallerIdentity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let row = service.get_from_trash(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(row)))
}

#[get("/alumni/{alumni_id}")]
async fn list_by_alumni(
    service: Data<PekerjaanService>,
    _caller: CallerIdentity,
    alumni_id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let rows = service.list_by_alumni(alumni_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(rows)))
}

#[get("/{id}")]
async fn get_pekerjaan(
    service: Data<PekerjaanService>,
    _caller: CallerIdentity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let row = service.get_active(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(row)))
}

#[post("")]
async fn create_pekerjaan(
    service: Data<PekerjaanService>,
    caller: CallerIdentity,
    body: Json<CreatePekerjaanRequest>,
) -> Result<HttpResponse, ServiceError> {
    let row = service.create(&caller, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(row)))
}

#[put("/restore/{id}")]
async fn restore_pekerjaan(
    service: Data<PekerjaanService>,
    caller: CallerIdentity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.restore(&caller, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Pekerjaan restored")))
}

#[put("/{id}")]
async fn update_pekerjaan(
    service: Data<PekerjaanService>,
    _caller: CallerIdentity,
    id: Path<i32>,
    body: Json<UpdatePekerjaanRequest>,
) -> Result<HttpResponse, ServiceError> {
    let row = service.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(row)))
}

#[delete("/hard-delete/{id}")]
async fn hard_delete_pekerjaan(
    service: Data<PekerjaanService>,
    caller: CallerIdentity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.hard_delete(&caller, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Pekerjaan permanently deleted")))
}

#[delete("/{id}")]
async fn soft_delete_pekerjaan(
    service: Data<PekerjaanService>,
    caller: CallerIdentity,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.soft_delete(&caller, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Pekerjaan moved to trash")))
}

/// Literal segments (`trash`, `alumni`, `restore`, `hard-delete`) are
/// registered ahead of the `{id}` routes so they win the match.
pub fn pekerjaan_config(config: &mut ServiceConfig) {
    config.service(
        scope("/pekerjaan")
            .service(list_pekerjaan)
            .service(create_pekerjaan)
            .service(list_trash)
            .service(get_from_trash)
            .service(list_by_alumni)
            .service(restore_pekerjaan)
            .service(hard_delete_pekerjaan)
            .service(get_pekerjaan)
            .service(update_pekerjaan)
            .service(soft_delete_pekerjaan),
    );
}
