use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Health {
    status: &'static str,
}

pub(crate) async fn handle() -> Json<Health> {
    Json(Health { status: "UP" })
}
