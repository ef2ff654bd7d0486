use axum::Json;
use axum::extract::Extension;

use crate::dto::FlashMessageResponse;
use crate::flash::FlashMessages;

pub async fn drain_messages_handler(
    Extension(flash): Extension<FlashMessages>,
) -> Json<Vec<FlashMessageResponse>> {
    Json(
        flash
            .drain()
            .await
            .into_iter()
            .map(FlashMessageResponse::from)
            .collect(),
    )
}
