//! End-to-end tests of the `drivedeck` binary against a mock storage API.
//!
//! Every test runs the compiled binary with its own config file in a temp
//! directory and `--base-url` pointing at a fresh wiremock server. Stdin is
//! not a terminal, so commands never prompt.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tempfile::TempDir;
use tokio::process::Command;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

const STORAGE: &str = "/hos-service/api/v1/taskmanager/drive/storage/default";

struct CliTestContext {
    mock_server: MockServer,
    dir: TempDir,
}

impl CliTestContext {
    async fn new() -> Self {
        Self {
            mock_server: MockServer::start().await,
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn local_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write local file");
        path
    }

    fn endpoint(action: &str) -> String {
        format!("{STORAGE}/{action}")
    }

    async fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_drivedeck"))
            .args(args)
            .arg("--base-url")
            .arg(self.mock_server.uri())
            .env("DRIVEDECK_CONFIG", self.config_path())
            .env_remove("DRIVEDECK_API_BASE_URL")
            .env_remove("DRIVEDECK_STORAGE_PREFIX")
            .env_remove("DRIVEDECK_DRIVE_ID")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .output()
            .await
            .expect("run drivedeck")
    }

    async fn mock_list(&self, dir: &str, names: &[&str]) {
        let data: Vec<_> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "path": format!("{dir}{name}"),
                    "isDir": false,
                    "size": 2048,
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path(Self::endpoint("list")))
            .and(query_param("path", dir))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })))
            .mount(&self.mock_server)
            .await;
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn local_path(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[tokio::test]
async fn test_ls_prints_page_files() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/audio/", &["hello.mp3", "bye.wav"]).await;

    let output = ctx.run(&["ls", "audio"]).await;

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("hello.mp3"));
    assert!(text.contains("bye.wav"));
    assert!(text.contains("2 file(s)"));
}

#[tokio::test]
async fn test_ls_empty_page() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/models/", &[]).await;

    let output = ctx.run(&["ls", "models"]).await;

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("No files in /retail/models/."));
}

#[tokio::test]
async fn test_ls_reports_server_error() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("GET"))
        .and(path(CliTestContext::endpoint("list")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.mock_server)
        .await;

    let output = ctx.run(&["ls", "audio"]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Failed to list files: Internal Server Error"));
}

#[tokio::test]
async fn test_ls_rejects_config_page() {
    let ctx = CliTestContext::new().await;

    let output = ctx.run(&["ls", "object-config"]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("drivedeck config"));
}

#[tokio::test]
async fn test_upload_skip_existing_sends_only_new_files() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/audio/", &["a.mp3"]).await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("upload")))
        .and(body_string_contains("filename=\"b.mp3\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("upload")))
        .and(body_string_contains("filename=\"a.mp3\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let a = ctx.local_file("a.mp3", "aa");
    let b = ctx.local_file("b.mp3", "bb");
    let output = ctx
        .run(&["upload", "audio", local_path(&a), local_path(&b), "--skip-existing"])
        .await;

    assert!(output.status.success(), "{output:?}");
}

#[tokio::test]
async fn test_upload_conflict_without_flag_refuses() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/audio/", &["a.mp3"]).await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("upload")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let a = ctx.local_file("a.mp3", "aa");
    let output = ctx.run(&["upload", "audio", local_path(&a)]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("--overwrite or --skip-existing"));
}

#[tokio::test]
async fn test_upload_failure_exits_non_zero() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/audio/", &[]).await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("upload")))
        .respond_with(ResponseTemplate::new(413))
        .mount(&ctx.mock_server)
        .await;

    let a = ctx.local_file("a.mp3", "aa");
    let output = ctx.run(&["upload", "audio", local_path(&a)]).await;

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Payload Too Large"));
    assert!(text.contains("0 of 1 file(s) uploaded"));
}

#[tokio::test]
async fn test_rm_all_with_yes_deletes_every_file() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/models/", &["a.onnx", "b.onnx"]).await;
    for name in ["a.onnx", "b.onnx"] {
        Mock::given(method("DELETE"))
            .and(path(CliTestContext::endpoint("file")))
            .and(query_param("path", format!("/retail/models/{name}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&ctx.mock_server)
            .await;
    }

    let output = ctx.run(&["rm", "models", "--all", "--yes"]).await;

    assert!(output.status.success(), "{output:?}");
}

#[tokio::test]
async fn test_rm_without_yes_refuses_off_terminal() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/models/", &["a.onnx"]).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let output = ctx.run(&["rm", "models", "a.onnx"]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("without --yes"));
}

#[tokio::test]
async fn test_get_writes_file() {
    let ctx = CliTestContext::new().await;
    ctx.mock_list("/retail/audio/", &["hello.mp3"]).await;
    Mock::given(method("GET"))
        .and(path(CliTestContext::endpoint("download")))
        .and(query_param("path", "/retail/audio/hello.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
        .mount(&ctx.mock_server)
        .await;

    let target = ctx.dir.path().join("out.mp3");
    let output = ctx
        .run(&["get", "audio", "hello.mp3", "-o", local_path(&target)])
        .await;

    assert!(output.status.success(), "{output:?}");
    assert_eq!(std::fs::read(&target).expect("downloaded file"), b"ID3");
}

#[tokio::test]
async fn test_config_check_rejects_invalid_yaml() {
    let ctx = CliTestContext::new().await;
    let file = ctx.local_file("bad.yml", "objects: [unclosed\n");

    let output = ctx.run(&["config", "check", local_path(&file)]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("is not a valid config"));
}

#[tokio::test]
async fn test_config_apply_uploads_changed_document() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("GET"))
        .and(path(CliTestContext::endpoint("download")))
        .and(query_param("path", "/retail/object-config/config.yml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("objects: []\n"))
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("upload")))
        .and(body_string_contains("filename=\"config.yml\""))
        .and(body_string_contains("cup"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let file = ctx.local_file("config.yml", "objects:\n  - cup\n");
    let output = ctx.run(&["config", "apply", local_path(&file)]).await;

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("Config saved"));
}

#[tokio::test]
async fn test_config_apply_creates_missing_document() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("GET"))
        .and(path(CliTestContext::endpoint("download")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("upload")))
        .and(body_string_contains("filename=\"config.yml\""))
        .and(body_string_contains("/retail/object-config/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let file = ctx.local_file("config.yml", "objects: []\n");
    let output = ctx.run(&["config", "apply", local_path(&file)]).await;

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("does not exist yet"));
    assert!(text.contains("Config saved"));
}

#[tokio::test]
async fn test_config_apply_stops_on_server_error() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("GET"))
        .and(path(CliTestContext::endpoint("download")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("upload")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let file = ctx.local_file("config.yml", "objects: []\n");
    let output = ctx.run(&["config", "apply", local_path(&file)]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Internal Server Error"));
}

#[tokio::test]
async fn test_pages_shows_goods_manager_link_from_config() {
    let ctx = CliTestContext::new().await;
    std::fs::write(
        ctx.config_path(),
        "[pages.goods-manager]\nlink = \"http://admin.robot.local\"\n",
    )
    .expect("write config");

    let output = ctx.run(&["pages"]).await;

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains("goods-manager"));
    assert!(text.contains("http://admin.robot.local"));
}

#[tokio::test]
async fn test_login_token_is_sent_on_later_commands() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("GET"))
        .and(path(CliTestContext::endpoint("list")))
        .and(header("authorization", "Bearer cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let login = ctx.run(&["login", "--token", "cli-token"]).await;
    assert!(login.status.success(), "{login:?}");
    let stored = std::fs::read_to_string(ctx.config_path()).expect("config written");
    assert!(stored.contains("cli-token"));

    let status = ctx.run(&["status"]).await;
    assert!(stdout(&status).contains("stored"));

    let output = ctx.run(&["ls", "grasp-teach"]).await;
    assert!(output.status.success(), "{output:?}");
}

#[tokio::test]
async fn test_mv_sends_transfer_body() {
    let ctx = CliTestContext::new().await;
    Mock::given(method("POST"))
        .and(path(CliTestContext::endpoint("move")))
        .and(body_string_contains("\"overWrite\":true"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let output = ctx
        .run(&["mv", "/retail/map/a.pgm", "/retail/map/b.pgm", "--overwrite"])
        .await;

    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("Moved /retail/map/a.pgm to /retail/map/b.pgm"));
}
