use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// The binary with credentials given and no ambient Classeur environment.
fn cldownload() -> Command {
    let mut cmd = Command::cargo_bin("cldownload").expect("Binary exists");
    cmd.env_remove("CLASSEUR_USER_ID")
        .env_remove("CLASSEUR_API_KEY")
        .env_remove("CLASSEUR_HOST")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_both_subcommands() {
    cldownload()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list").and(predicate::str::contains("save")));
}

#[test]
fn list_without_items_fails_before_any_request() {
    cldownload()
        .args(["-u", "user", "-k", "key", "--host", "http://127.0.0.1:9", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one file or folder must be specified"));
}

#[test]
fn missing_api_key_is_reported() {
    cldownload()
        .args(["-u", "user", "list", "-d", "F1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--api-key is required"));
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    cldownload()
        .args(["-u", "user", "-k", "key", "--host", "http://127.0.0.1:9", "save", "-d", "F1", "F2", "-p"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not stat directory"));
}

#[test]
fn metadata_requires_folders() {
    let dir = tempdir().unwrap();
    cldownload()
        .args(["-u", "user", "-k", "key", "save", "-f", "X", "Y", "--metadata", "--destination"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--metadata requires at least one --folders value"));
}

#[test]
fn save_requires_a_path() {
    cldownload()
        .args(["-u", "user", "-k", "key", "save", "-d", "F1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--save-path"));
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn run_emits_started_event_even_when_validation_fails() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use cldownload::cli::{run, Cli, Commands, GlobalArgs, ItemArgs};

    let cli = Cli {
        global: GlobalArgs {
            user_id: Some("user".into()),
            api_key: Some("key".into()),
            ..GlobalArgs::default()
        },
        command: Commands::List(ItemArgs::default()),
    };

    let err = run(cli).await.expect_err("no items should fail validation");
    assert!(err.to_string().contains("At least one file or folder"));

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("run_started")),
        "Expected a 'run_started' trace event, got: {:?}",
        event_msgs
    );
}
