use actix_multipart::Multipart;
use actix_web::{web, Error, HttpResponse, Result};
use futures_util::StreamExt;
use log::{debug, error, info};
use uuid::Uuid;

use crate::inference::InferenceForwarder;
use crate::models::{self, ChurnRecord, HealthResponse, InferencePayload};

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        message: "Hello World",
    })
}

pub async fn predict(
    forwarder: web::Data<InferenceForwarder>,
    churn: web::Json<ChurnRecord>,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();
    debug!("[{}] input record: {:?}", request_id, churn);

    let payload = InferencePayload::from_record(&churn);

    info!(
        "[{}] forwarding 1 row to {}",
        request_id,
        forwarder.endpoint()
    );
    let body = forwarder.forward(&payload).await?;
    debug!("[{}] backend response: {}", request_id, body);

    Ok(HttpResponse::Ok().body(body))
}

pub async fn batch_predict(
    forwarder: web::Data<InferenceForwarder>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();

    // Drain the uploaded file into memory.
    let mut raw = web::BytesMut::new();
    while let Some(item) = payload.next().await {
        let mut field = item?;
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            raw.extend_from_slice(&data);
        }
    }

    let text = std::str::from_utf8(&raw).map_err(|e| {
        error!("[{}] uploaded file is not valid UTF-8: {}", request_id, e);
        actix_web::error::ErrorInternalServerError("Could not decode uploaded file")
    })?;

    // No schema checks here: whatever rows the file yields go to the model
    // server as-is.
    let rows = models::rows_from_csv(text).map_err(|e| {
        error!("[{}] failed to parse uploaded CSV: {}", request_id, e);
        actix_web::error::ErrorInternalServerError("Could not parse uploaded file")
    })?;

    info!(
        "[{}] forwarding {} rows to {}",
        request_id,
        rows.len(),
        forwarder.endpoint()
    );
    let body = forwarder.forward(&InferencePayload::from_rows(rows)).await?;
    debug!("[{}] backend response: {}", request_id, body);

    Ok(HttpResponse::Ok().body(body))
}
