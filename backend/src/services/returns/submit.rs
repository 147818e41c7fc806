use crate::config::AppConfig;
use crate::error::ExportError;
use crate::export::{export_submission, ExportOutcome};
use crate::uploads::uploaders_from_config;
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use common::model::submission::Submission;
use common::requests::SubmitResponse;
use log::error;

/// HTTP handler wrapper that converts the export result into a `SubmitResponse`.
///
/// - `200 OK`: files written; upload results are included but never fail the request.
/// - `422 Unprocessable Entity`: every validation message, nothing written.
/// - `500 Internal Server Error`: storage failure, detail only in the log.
pub(crate) async fn process(
    config: web::Data<AppConfig>,
    payload: web::Json<Submission>,
) -> impl Responder {
    match submit_returns(config, payload.into_inner()).await {
        Ok(outcome) => HttpResponse::Ok().json(SubmitResponse::Exported {
            message: outcome.summary(),
            files: outcome.file_names(),
            uploads: outcome.uploads,
        }),
        Err(ExportError::Validation(errors)) => {
            HttpResponse::UnprocessableEntity().json(SubmitResponse::Invalid { errors: errors.0 })
        }
        Err(e) => {
            error!("Export failed: {}", e);
            HttpResponse::InternalServerError().json(SubmitResponse::Failed {
                message: "Export failed".to_string(),
            })
        }
    }
}

/// Runs the blocking export on Actix's blocking pool so file and network I/O
/// never stall the server workers.
async fn submit_returns(
    config: web::Data<AppConfig>,
    submission: Submission,
) -> Result<ExportOutcome, ExportError> {
    web::block(move || {
        let uploaders = uploaders_from_config(&config.export);
        export_submission(&config.export, &submission, Utc::now(), &uploaders)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use common::requests::SubmitResponse;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> AppConfig {
        let root = root.to_string_lossy().into_owned();
        AppConfig::from_lookup(move |key| (key == "EXPORTS_DIR").then(|| root.clone())).unwrap()
    }

    fn alice(quantity: serde_json::Value) -> serde_json::Value {
        json!({
            "CreatedBy": "Alice",
            "Source": "WH1",
            "Destination": "WH2",
            "Rows": [{"ParentCode": "P1", "ParentName": "Widget", "Quantity": quantity}]
        })
    }

    macro_rules! service_for {
        ($root:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config_for($root)))
                    .configure(crate::services::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn exports_valid_submission_without_uploads() {
        let dir = TempDir::new().unwrap();
        let app = service_for!(dir.path());

        let req = test::TestRequest::post()
            .uri("/api/returns/submit")
            .set_json(alice(json!(5)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: SubmitResponse = test::read_body_json(resp).await;
        let (files, uploads, message) = match body {
            SubmitResponse::Exported {
                files,
                uploads,
                message,
            } => (files, uploads, message),
            other => panic!("expected an export, got {other:?}"),
        };
        assert_eq!(files.len(), 2);
        assert!(files[0].starts_with("STORE_RETURN") && files[0].ends_with(".CSV"));
        assert!(files[1].starts_with("STORE_RET_DAMAGE") && files[1].ends_with(".CSV"));
        assert!(uploads.is_empty());
        assert!(message.ends_with("saved locally."));

        let day_dirs: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(day_dirs.len(), 1);
        let day = day_dirs[0].as_ref().unwrap().path();
        for name in &files {
            let text = fs::read_to_string(day.join(name)).unwrap();
            assert!(text.contains(",P1,Widget,"));
        }
    }

    #[actix_web::test]
    async fn zero_quantity_is_rejected_with_row_number() {
        let dir = TempDir::new().unwrap();
        let app = service_for!(dir.path());

        let req = test::TestRequest::post()
            .uri("/api/returns/submit")
            .set_json(alice(json!(0)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: SubmitResponse = test::read_body_json(resp).await;
        assert_eq!(
            body,
            SubmitResponse::Invalid {
                errors: vec!["Row 1: Quantity is required and must be ≥ 1".to_string()]
            }
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn storage_failure_is_reported_generically() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("exports");
        fs::write(&root, "not a directory").unwrap();
        let app = service_for!(&root);

        let req = test::TestRequest::post()
            .uri("/api/returns/submit")
            .set_json(alice(json!("5")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: SubmitResponse = test::read_body_json(resp).await;
        assert_eq!(
            body,
            SubmitResponse::Failed {
                message: "Export failed".to_string()
            }
        );
    }

    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = service_for!(dir.path());

        let req = test::TestRequest::post()
            .uri("/api/returns/submit")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn health_answers_ok() {
        let dir = TempDir::new().unwrap();
        let app = service_for!(dir.path());

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "ok": true }));
    }
}
