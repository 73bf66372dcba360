use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::health::*;
use crate::handlers::image::*;
use crate::handlers::photo::*;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(photo_routes())
        .routes(routes!(serve_image))
        .routes(routes!(healthcheck))
}

fn photo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_photos))
        .routes(routes!(create_photo))
        .routes(routes!(get_photo, update_photo, delete_photo))
}
