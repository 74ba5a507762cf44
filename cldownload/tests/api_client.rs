use cldownload::api::{ClasseurClient, Credentials};
use cldownload_core::contract::{ApiError, ClasseurApi};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned HTTP response per connection and record request heads.
async fn canned_server(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            recorded
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(&buf[..n]).into_owned());
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    (format!("http://{addr}"), seen)
}

fn client(host: &str) -> ClasseurClient {
    ClasseurClient::new(&Credentials {
        user_id: "user".into(),
        api_key: "secret".into(),
        host: host.into(),
    })
    .expect("client should build")
}

#[tokio::test]
async fn get_file_sends_basic_auth_and_decodes_content() {
    let (host, seen) = canned_server(
        "200 OK",
        r##"{"id":"X","name":"solo","content":{"text":"# hi","properties":{}},"updated":1}"##,
    )
    .await;

    let file = client(&host).get_file("X".into()).await.expect("file should decode");
    assert_eq!(file.text(), "# hi");

    let requests = seen.lock().unwrap();
    let head = requests[0].to_lowercase();
    assert!(head.starts_with("get /api/v1/files/x http/1.1"), "unexpected request: {head}");
    // base64("user:secret")
    assert!(head.contains("authorization: basic dxnlcjpzzwnyzxq="));
}

#[tokio::test]
async fn file_metadata_is_requested_in_one_call_and_never_has_children() {
    let (host, seen) = canned_server(
        "200 OK",
        r#"[{"id":"X","name":"solo"},{"id":"Y","name":"other","files":[]}]"#,
    )
    .await;

    let stubs = client(&host)
        .get_files(vec!["X".into(), "Y".into()])
        .await
        .unwrap();
    assert_eq!(stubs.len(), 2);
    assert!(stubs.iter().all(|s| s.files.is_none()));
    assert!(seen.lock().unwrap()[0].starts_with("GET /api/v1/metadata/files?id=X%2CY "));
}

#[tokio::test]
async fn folders_without_file_lists_are_still_folders() {
    let (host, _) = canned_server("200 OK", r#"{"id":"F1","name":"Notes"}"#).await;
    let folders = client(&host).get_folders(vec!["F1".into()]).await.unwrap();
    assert!(matches!(folders[0].files.as_deref(), Some([])));
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
    let (host, _) = canned_server("401 Unauthorized", r#"{"message":"bad credentials"}"#).await;
    let err = client(&host).get_file("X".into()).await.unwrap_err();
    match err {
        ApiError::Status { status, ref body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad credentials"));
            assert!(err.is_unauthorized());
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let (host, _) = canned_server("200 OK", "not json").await;
    let err = client(&host).get_file("X".into()).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

/// Talks to the real service; skipped unless credentials and a folder ID are set.
#[tokio::test]
#[serial]
async fn live_folder_listing() {
    dotenvy::dotenv().ok();
    let (Ok(user_id), Ok(api_key), Ok(folder)) = (
        std::env::var("CLASSEUR_USER_ID"),
        std::env::var("CLASSEUR_API_KEY"),
        std::env::var("CLASSEUR_TEST_FOLDER"),
    ) else {
        eprintln!("skipping live test: CLASSEUR_USER_ID, CLASSEUR_API_KEY or CLASSEUR_TEST_FOLDER unset");
        return;
    };
    let host = std::env::var("CLASSEUR_HOST").unwrap_or_else(|_| "app.classeur.io".into());
    let client = ClasseurClient::new(&Credentials {
        user_id,
        api_key,
        host,
    })
    .expect("client should build");

    let folders = client.get_folders(vec![folder.clone()]).await;
    assert!(
        folders.is_ok(),
        "Expected folder {folder} to load, got: {:?}",
        folders.as_ref().err()
    );
    assert_eq!(folders.unwrap()[0].id.as_deref(), Some(folder.as_str()));
}
