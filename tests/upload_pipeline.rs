use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use httpmock::{Method::POST, MockServer};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use rustydigest::{
    api::create_router,
    extraction::LopdfExtractor,
    processing::{ProcessingOptions, ProcessingService},
    summarization::HuggingFaceSummarizationClient,
};
use serde_json::{Value, json};

const BOUNDARY: &str = "upload-pipeline-boundary";
const MODEL: &str = "sshleifer/distilbart-cnn-12-6";

fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![36.into(), 756.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => Vec::new(),
        };
        let content = Content { operations }.encode().expect("encode content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize pdf");
    bytes
}

fn build_app(server: &MockServer) -> Router {
    let client = HuggingFaceSummarizationClient::new(server.base_url(), None).expect("client");
    let service = ProcessingService::new(
        Arc::new(LopdfExtractor::new()),
        Arc::new(client),
        ProcessingOptions {
            chunk_size: 1000,
            max_chunks: 3,
            model: MODEL.into(),
            summary_max_length: 130,
            summary_min_length: 30,
        },
    );
    create_router(Arc::new(service), 10 * 1024 * 1024)
}

async fn upload(app: Router, document: &[u8]) -> (StatusCode, Value) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"pdf\"; filename=\"report.pdf\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(document);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request");

    let response = tower::ServiceExt::oneshot(app, request)
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn short_pdf_is_summarized_with_one_model_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/models/{MODEL}"))
                .body_contains("Quarterly revenue grew")
                .json_body_partial(
                    r#"{"parameters":{"max_length":130,"min_length":30,"do_sample":false}}"#,
                );
            then.status(200)
                .json_body(json!([{ "summary_text": "Revenue grew." }]));
        })
        .await;

    let pdf = pdf_with_pages(&[Some("Quarterly revenue grew by ten percent.")]);
    let (status, body) = upload(build_app(&server), &pdf).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": "Revenue grew." }));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn long_pdf_is_capped_at_three_model_calls() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("/models/{MODEL}"));
            then.status(200).json_body(json!([{ "summary_text": "S" }]));
        })
        .await;

    let page = "lorem ipsum dolor sit amet ".repeat(60);
    let pdf = pdf_with_pages(&[Some(page.as_str()), Some(page.as_str()), Some(page.as_str())]);
    let (status, body) = upload(build_app(&server), &pdf).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "S\nS\nS");
    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn textless_pdf_is_rejected_without_model_calls() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!([{ "summary_text": "unused" }]));
        })
        .await;

    let pdf = pdf_with_pages(&[None, None]);
    let (status, body) = upload(build_app(&server), &pdf).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No readable text in PDF" }));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn malformed_input_is_an_internal_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!([{ "summary_text": "unused" }]));
        })
        .await;

    let noise: Vec<u8> = (0..256u32).map(|i| (i * 101 % 253) as u8).collect();
    for document in [Vec::new(), noise] {
        let (status, body) = upload(build_app(&server), &document).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().expect("error message");
        assert!(!message.is_empty());
    }
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn model_failure_is_reported_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500).body("CUDA out of memory");
        })
        .await;

    let pdf = pdf_with_pages(&[Some("Some readable text.")]);
    let (status, body) = upload(build_app(&server), &pdf).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|message| message.contains("CUDA out of memory"))
    );
}
