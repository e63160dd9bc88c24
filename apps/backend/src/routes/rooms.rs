use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Public listing, same entries as the realtime `rooms_list`.
async fn list_rooms(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.rooms.list_rooms()))
}

async fn get_room(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let summary = app_state.rooms.room_summary(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_rooms))
        .route("/{room_id}", web::get().to(get_room));
}
