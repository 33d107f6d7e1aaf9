use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use reelroute_cli::adapters::{AppConfig, JsonFileStore};
use reelroute_cli::app::{AppContainer, DefaultAppContainer};
use reelroute_cli::domain::document::CanvasDocument;
use reelroute_cli::ports::*;
use reelroute_cli::*;

/// Test doubles for the media collaborators
mod test_utils {
    use super::*;

    /// Probe answering from a fixed table; unknown files fail
    #[derive(Default)]
    pub struct TableProbe {
        pub entries: HashMap<PathBuf, MediaProbe>,
    }

    impl TableProbe {
        pub fn with(mut self, path: &Path, seconds: f64, size: Option<(u32, u32)>) -> Self {
            self.entries.insert(
                path.to_path_buf(),
                MediaProbe {
                    duration: Duration::from_secs_f64(seconds),
                    width: size.map(|s| s.0),
                    height: size.map(|s| s.1),
                },
            );
            self
        }
    }

    #[async_trait]
    impl ProbePort for TableProbe {
        async fn probe(&self, path: &Path) -> Result<MediaProbe, DomainError> {
            self.entries
                .get(path)
                .cloned()
                .ok_or_else(|| DomainError::ProbeFail(path.display().to_string()))
        }
    }

    /// Player that records what it was asked to play
    #[derive(Default)]
    pub struct RecordingPlayer {
        pub calls: Mutex<Vec<Vec<PathBuf>>>,
    }

    #[async_trait]
    impl PlaybackPort for RecordingPlayer {
        async fn play_sequence(&self, files: &[PathBuf]) -> Result<PlaybackReport, DomainError> {
            self.calls.lock().unwrap().push(files.to_vec());
            Ok(PlaybackReport {
                played: files.to_vec(),
                failed: Vec::new(),
            })
        }
    }

    /// Exporter that records the request instead of running ffmpeg
    #[derive(Default)]
    pub struct RecordingExporter {
        pub requests: Mutex<Vec<ConcatRequest>>,
    }

    #[async_trait]
    impl ConcatExportPort for RecordingExporter {
        async fn export(&self, request: &ConcatRequest) -> Result<ExportReport, DomainError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(ExportReport {
                output: request.output.clone(),
                clips: request.files.len(),
            })
        }
    }

    pub struct Fixture {
        pub temp: TempDir,
        pub project: PathBuf,
        pub player: Arc<RecordingPlayer>,
        pub exporter: Arc<RecordingExporter>,
        pub container: DefaultAppContainer,
    }

    impl Fixture {
        pub fn new(probe: TableProbe) -> Self {
            Self::with_temp(TempDir::new().unwrap(), probe)
        }

        pub fn with_temp(temp: TempDir, probe: TableProbe) -> Self {
            let project = temp.path().join("canvas.json");
            let player = Arc::new(RecordingPlayer::default());
            let exporter = Arc::new(RecordingExporter::default());
            let container = DefaultAppContainer::with_ports(
                Arc::new(JsonFileStore::new()),
                Arc::new(probe),
                Arc::clone(&player) as Arc<dyn PlaybackPort>,
                Arc::clone(&exporter) as Arc<dyn ConcatExportPort>,
                &AppConfig::default(),
            );
            Self {
                temp,
                project,
                player,
                exporter,
                container,
            }
        }

        /// Write a small file standing in for a clip
        pub fn clip(&self, name: &str) -> PathBuf {
            let path = self.temp.path().join(name);
            std::fs::write(&path, b"not really a video").unwrap();
            path
        }

        pub async fn edit(&self, commands: Vec<EditCommand>) -> Vec<CommandOutcome> {
            self.container
                .edit_interactor()
                .edit(&self.project, commands)
                .await
                .unwrap()
                .outcomes
        }
    }

    pub fn link(source: u32, target: u32) -> EditCommand {
        EditCommand::Connect {
            source: NodeId(source),
            target: NodeId(target),
        }
    }

    pub fn bind(id: u32, path: &Path) -> EditCommand {
        EditCommand::BindFile {
            id: NodeId(id),
            path: path.to_path_buf(),
        }
    }
}

use test_utils::*;

#[tokio::test]
async fn test_edits_persist_between_runs() {
    let fixture = Fixture::new(TableProbe::default());
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();

    let outcomes = fixture
        .edit(vec![
            EditCommand::AddNode,
            EditCommand::AddNode,
            EditCommand::AddNode,
            link(1, 2),
            link(2, 3),
        ])
        .await;
    assert_eq!(outcomes[0], CommandOutcome::NodeAdded(NodeId(1)));
    assert_eq!(outcomes[2], CommandOutcome::NodeAdded(NodeId(3)));

    let listing = fixture.container.sequence_interactor().list(&fixture.project).await.unwrap();
    assert!(listing.problem.is_none());
    assert_eq!(listing.sequences.len(), 1);
    assert_eq!(listing.sequences[0].name, "Sequence 1");
    assert_eq!(listing.sequences[0].route.to_string(), "1 -> 2 -> 3");
}

#[tokio::test]
async fn test_init_refuses_to_overwrite() {
    let fixture = Fixture::new(TableProbe::default());
    let edit = fixture.container.edit_interactor();
    edit.init(&fixture.project, false).await.unwrap();
    fixture.edit(vec![EditCommand::AddNode]).await;

    assert!(matches!(
        edit.init(&fixture.project, false).await,
        Err(DomainError::BadArgs(_))
    ));

    edit.init(&fixture.project, true).await.unwrap();
    let graph = fixture.container.sequence_interactor().graph(&fixture.project).await.unwrap();
    assert!(graph.is_empty());
}

#[tokio::test]
async fn test_edit_without_canvas_fails() {
    let fixture = Fixture::new(TableProbe::default());
    let result = fixture
        .container
        .edit_interactor()
        .edit(&fixture.project, vec![EditCommand::AddNode])
        .await;
    assert!(matches!(result, Err(DomainError::FileNotFound(_))));
}

#[tokio::test]
async fn test_ignored_commands_leave_file_untouched() {
    let fixture = Fixture::new(TableProbe::default());
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    let before = std::fs::read_to_string(&fixture.project).unwrap();

    let response = fixture
        .container
        .edit_interactor()
        .edit(&fixture.project, vec![link(1, 2)])
        .await
        .unwrap();

    assert!(response.outcomes[0].is_ignored());
    assert!(!response.saved);
    assert_eq!(std::fs::read_to_string(&fixture.project).unwrap(), before);
}

#[tokio::test]
async fn test_dangling_entries_dropped_on_load() {
    let fixture = Fixture::new(TableProbe::default());
    std::fs::write(
        &fixture.project,
        r#"{
            "squares": [[10, 10, 50, 1], [70, 10, 50, 2]],
            "square_files": {"1": "a.mp4", "9": "ghost.mp4"},
            "connections": [[1, 2], [2, 7]]
        }"#,
    )
    .unwrap();

    let response = fixture
        .container
        .edit_interactor()
        .edit(&fixture.project, vec![EditCommand::AddNode])
        .await
        .unwrap();
    assert_eq!(response.load_report.dropped_edges, 1);
    assert_eq!(response.load_report.dropped_bindings, 1);
    assert_eq!(response.outcomes[0], CommandOutcome::NodeAdded(NodeId(3)));

    let saved = CanvasDocument::from_json(&std::fs::read_to_string(&fixture.project).unwrap()).unwrap();
    assert_eq!(saved.connections, vec![(1, 2)]);
    assert_eq!(saved.square_files.len(), 1);
    let aliases = saved.aliases.unwrap();
    assert_eq!(aliases.get("1").map(String::as_str), Some("Node 1"));
}

#[tokio::test]
async fn test_cycle_degrades_to_no_sequences() {
    let fixture = Fixture::new(TableProbe::default());
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    let response = fixture
        .container
        .edit_interactor()
        .edit(
            &fixture.project,
            vec![EditCommand::AddNode, EditCommand::AddNode, link(1, 2), link(2, 1)],
        )
        .await
        .unwrap();
    assert!(response.sequences.is_empty());

    let listing = fixture.container.sequence_interactor().list(&fixture.project).await.unwrap();
    assert!(listing.sequences.is_empty());
    assert!(listing.problem.unwrap().contains("cycle"));

    let play = fixture.container.export_interactor().play(&fixture.project, "Sequence 1").await;
    assert!(matches!(play, Err(DomainError::Route(RouteError::CycleDetected { .. }))));
}

#[tokio::test]
async fn test_play_skips_unbound_nodes() {
    let fixture = Fixture::new(TableProbe::default());
    let a = fixture.clip("a.mp4");
    let c = fixture.clip("c.mp4");
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    fixture
        .edit(vec![
            EditCommand::AddNode,
            EditCommand::AddNode,
            EditCommand::AddNode,
            link(1, 2),
            link(2, 3),
            bind(1, &a),
            bind(3, &c),
        ])
        .await;

    let report = fixture
        .container
        .export_interactor()
        .play(&fixture.project, "Sequence 1")
        .await
        .unwrap();

    assert_eq!(report.played, vec![a.clone(), c.clone()]);
    assert_eq!(*fixture.player.calls.lock().unwrap(), vec![vec![a, c]]);
}

#[tokio::test]
async fn test_play_without_files_is_nothing_to_play() {
    let fixture = Fixture::new(TableProbe::default());
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    fixture.edit(vec![EditCommand::AddNode, EditCommand::AddNode, link(1, 2)]).await;

    let result = fixture.container.export_interactor().play(&fixture.project, "Sequence 1").await;
    assert!(matches!(result, Err(DomainError::NothingToPlay(_))));
    assert!(fixture.player.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_sequence_name() {
    let fixture = Fixture::new(TableProbe::default());
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    fixture.edit(vec![EditCommand::AddNode]).await;

    let result = fixture.container.export_interactor().play(&fixture.project, "Sequence 2").await;
    assert!(matches!(result, Err(DomainError::SequenceNotFound(name)) if name == "Sequence 2"));
}

#[tokio::test]
async fn test_export_scales_to_first_clip() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.mp4");
    let b = temp.path().join("b.mp4");
    let probe = TableProbe::default()
        .with(&a, 4.0, Some((1920, 1080)))
        .with(&b, 2.0, Some((640, 480)));
    let fixture = Fixture::with_temp(temp, probe);
    fixture.clip("a.mp4");
    fixture.clip("b.mp4");

    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    fixture
        .edit(vec![EditCommand::AddNode, EditCommand::AddNode, link(1, 2), bind(1, &a), bind(2, &b)])
        .await;

    let output = fixture.temp.path().join("out/final.mp4");
    let report = fixture
        .container
        .export_interactor()
        .export_video(&fixture.project, "Sequence 1", &output)
        .await
        .unwrap();
    assert_eq!(report.clips, 2);

    let requests = fixture.exporter.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].files, vec![a, b]);
    assert_eq!(requests[0].frame_size, Some((1920, 1080)));
    assert!(!requests[0].overwrite);
}

#[tokio::test]
async fn test_export_requires_existing_files() {
    let fixture = Fixture::new(TableProbe::default());
    let missing = fixture.temp.path().join("missing.mp4");
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    fixture.edit(vec![EditCommand::AddNode, bind(1, &missing)]).await;

    let result = fixture
        .container
        .export_interactor()
        .export_video(&fixture.project, "Sequence 1", &fixture.temp.path().join("o.mp4"))
        .await;
    assert!(matches!(result, Err(DomainError::FileNotFound(path)) if path == missing));
    assert!(fixture.exporter.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_edl_accumulates_and_skips_missing() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a.mp4");
    let b = temp.path().join("b.mp4");
    let gone = temp.path().join("gone.mp4");
    let probe = TableProbe::default().with(&a, 5.0, None).with(&b, 2.5, None);
    let fixture = Fixture::with_temp(temp, probe);
    fixture.clip("a.mp4");
    fixture.clip("b.mp4");

    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    fixture
        .edit(vec![
            EditCommand::AddNode,
            EditCommand::AddNode,
            EditCommand::AddNode,
            link(1, 2),
            link(2, 3),
            bind(1, &a),
            bind(2, &gone),
            bind(3, &b),
        ])
        .await;

    let output = fixture.temp.path().join("cut.edl");
    let report = fixture
        .container
        .export_interactor()
        .export_edl(&fixture.project, "Sequence 1", &output, Some("Rough Cut"))
        .await
        .unwrap();
    assert_eq!(report.events, 2);
    assert_eq!(report.skipped, vec![gone]);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("TITLE: Rough Cut\nFCM: NON-DROP FRAME\n\n"));
    assert!(text.contains("001  AX       V     C        00:00:00:00 00:00:05:00 00:00:00:00 00:00:05:00"));
    assert!(text.contains("002  AX       V     C        00:00:05:00 00:00:07:12 00:00:05:00 00:00:07:12"));
    assert!(text.contains("* FROM CLIP NAME: b.mp4"));
    assert!(!text.contains("gone.mp4"));
}

#[tokio::test]
async fn test_edl_with_only_missing_files() {
    let fixture = Fixture::new(TableProbe::default());
    fixture.container.edit_interactor().init(&fixture.project, false).await.unwrap();
    fixture
        .edit(vec![EditCommand::AddNode, bind(1, &fixture.temp.path().join("gone.mp4"))])
        .await;

    let output = fixture.temp.path().join("cut.edl");
    let result = fixture
        .container
        .export_interactor()
        .export_edl(&fixture.project, "Sequence 1", &output, None)
        .await;
    assert!(matches!(result, Err(DomainError::NothingToPlay(_))));
    assert!(!output.exists());
}
