use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, warn};
use mosquito_serve::{Category, Classifier, Error, Timer};
use serde::Serialize;

/// Multipart field carrying the uploaded image
const IMAGE_FIELD: &str = "image";

const NO_FILE: &str = "no file image";
const CONFIGURATION_ERROR: &str = "Kesalahan konfigurasi model";
const PROCESSING_ERROR: &str = "gagal memproses gambar";

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

fn error_response(status: StatusCode, error: &'static str, detail: Option<String>) -> Response {
    (status, Json(ErrorBody { error, detail })).into_response()
}

fn no_file() -> Response {
    error_response(StatusCode::BAD_REQUEST, NO_FILE, None)
}

pub fn app(classifier: Arc<Classifier>, body_limit: usize) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(classifier)
}

async fn predict(
    State(classifier): State<Arc<Classifier>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let t = Timer::start("Handling request");

    let response = match read_upload(multipart).await {
        Ok(data) => classify(classifier, data).await,
        Err(response) => response,
    };

    t.stop();
    response
}

/// Pull the bytes of the `image` file out of the form.
///
/// The first `image` part sent as a file decides. Parts named `image`
/// without a filename are plain form values and are skipped. A body that
/// cannot be read to the end, malformed or over the size limit, is a
/// processing failure wherever in the form it breaks.
async fn read_upload(multipart: Result<Multipart, MultipartRejection>) -> Result<Bytes, Response> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Request without multipart body: {}", rejection);
            return Err(no_file());
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(no_file()),
            Err(err) => return Err(unreadable_upload(err)),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        match field.file_name() {
            None => continue,
            Some("") => return Err(no_file()),
            Some(_) => {}
        }

        return field.bytes().await.map_err(unreadable_upload);
    }
}

fn unreadable_upload(err: MultipartError) -> Response {
    error!("Error reading upload: {}", err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        PROCESSING_ERROR,
        Some(err.to_string()),
    )
}

async fn classify(classifier: Arc<Classifier>, data: Bytes) -> Response {
    let result =
        tokio::task::spawn_blocking(move || classifier.classify_from_raw(&data)).await;

    match result {
        Ok(Ok(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(Err(err)) => classification_failure(err),
        Err(err) => {
            error!("Error processing image: {}", err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                PROCESSING_ERROR,
                Some(err.to_string()),
            )
        }
    }
}

fn classification_failure(err: Error) -> Response {
    let error = match err.category() {
        Category::Configuration => {
            error!("Model configuration error: {}", err);
            CONFIGURATION_ERROR
        }
        Category::Processing => {
            error!("Error processing image: {}", err);
            PROCESSING_ERROR
        }
    };

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        error,
        Some(err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use mosquito_serve::{ImageTensor, Model, Result};
    use serde_json::{json, Value};
    use std::io::Cursor;
    use tower::ServiceExt;

    const BOUNDARY: &str = "mosquito-test-boundary";

    struct Stub(Vec<f32>);

    impl Model for Stub {
        fn predict(&self, _: &ImageTensor) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    fn router(output: Vec<f32>) -> Router {
        limited_router(output, 1 << 20)
    }

    fn limited_router(output: Vec<f32>, body_limit: usize) -> Router {
        app(
            Arc::new(Classifier::new(Box::new(Stub(output)))),
            body_limit,
        )
    }

    fn probabilities(index: usize, value: f32) -> Vec<f32> {
        let mut v = vec![(1.0 - value) / 10.0; 11];
        v[index] = value;
        v
    }

    fn png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(500, 375, Rgba([120, 80, 40, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    /// One multipart part per `(name, filename, content)`
    fn form(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, content) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn classifies_uploaded_image() {
        let image = png();
        let request = upload(form(&[("image", Some("nyamuk.png"), image.as_slice())]));

        let (status, body) = send(router(probabilities(0, 0.8745)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasil"], "Aedes Aegypti");
        assert_eq!(body["akurasi"], "87.45%");
        assert!(body["keterangan"]
            .as_str()
            .unwrap()
            .starts_with("Ciri fisik utama"));
    }

    #[tokio::test]
    async fn unknown_species_is_not_detected() {
        let image = png();
        let request = upload(form(&[("image", Some("x.png"), image.as_slice())]));

        let (status, body) = send(router(probabilities(10, 0.6)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasil"], "Gambar tidak terdeteksi");
        assert_eq!(body["akurasi"], "60.00%");
    }

    #[tokio::test]
    async fn missing_image_field_is_rejected() {
        let image = png();
        let requests = vec![
            upload(form(&[("file", Some("x.png"), image.as_slice())])),
            upload(form(&[("image", None, &b"not a file"[..])])),
            upload(form(&[("image", Some(""), image.as_slice())])),
            upload(form(&[])),
        ];

        for request in requests {
            let (status, body) = send(router(probabilities(0, 1.0)), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "no file image" }));
        }
    }

    #[tokio::test]
    async fn non_multipart_body_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let (status, body) = send(router(probabilities(0, 1.0)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "no file image" }));
    }

    #[tokio::test]
    async fn undecodable_image_is_a_processing_failure() {
        let request = upload(form(&[("image", Some("x.png"), &b"not an image"[..])]));

        let (status, body) = send(router(probabilities(0, 1.0)), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], PROCESSING_ERROR);
        assert!(!body["detail"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn label_count_mismatch_is_a_configuration_error() {
        for len in vec![10, 12] {
            let image = png();
            let request = upload(form(&[("image", Some("x.png"), image.as_slice())]));

            let (status, body) = send(router(vec![0.5; len]), request).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], CONFIGURATION_ERROR);
            assert!(body["detail"]
                .as_str()
                .unwrap()
                .contains(&format!("Bentuk output model {}", len)));
        }
    }

    #[tokio::test]
    async fn repeated_upload_gives_same_answer() {
        let app = router(probabilities(4, 0.42));
        let image = png();

        let (_, first) = send(
            app.clone(),
            upload(form(&[("image", Some("x.png"), image.as_slice())])),
        )
        .await;
        let (_, second) = send(app, upload(form(&[("image", Some("x.png"), image.as_slice())]))).await;

        assert_eq!(first["hasil"], "Anopheles Atroparvus");
        assert_eq!(first["hasil"], second["hasil"]);
        assert_eq!(first["akurasi"], second["akurasi"]);
    }

    #[tokio::test]
    async fn oversized_body_fails_the_same_way_wherever_it_breaks() {
        let image = png();
        let padding = vec![b'x'; 8 * 1024];
        let forms = vec![
            form(&[("image", Some("x.png"), padding.as_slice())]),
            form(&[
                ("notes", None, padding.as_slice()),
                ("image", Some("x.png"), image.as_slice()),
            ]),
        ];

        for body in forms {
            let app = limited_router(probabilities(0, 1.0), 4 * 1024);
            let (status, body) = send(app, upload(body)).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], PROCESSING_ERROR);
        }
    }
}
