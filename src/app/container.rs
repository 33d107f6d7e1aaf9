use std::sync::Arc;

use crate::adapters::{AppConfig, FFmpegAdapter, FFplayAdapter, FFprobeAdapter, JsonFileStore};
use crate::app::{
    edit_interactor::EditInteractor, export_interactor::ExportInteractor,
    sequence_interactor::SequenceInteractor,
};
use crate::domain::routes::RouteEngine;
use crate::ports::{ConcatExportPort, DocumentStorePort, PlaybackPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn edit_interactor(&self) -> Arc<EditInteractor>;
    fn sequence_interactor(&self) -> Arc<SequenceInteractor>;
    fn export_interactor(&self) -> Arc<ExportInteractor>;
}

pub struct DefaultAppContainer {
    edit_interactor: Arc<EditInteractor>,
    sequence_interactor: Arc<SequenceInteractor>,
    export_interactor: Arc<ExportInteractor>,
}

impl DefaultAppContainer {
    /// Wire the system ffmpeg tools named in `config`
    pub fn new(config: &AppConfig) -> Self {
        Self::with_ports(
            Arc::new(JsonFileStore::new()),
            Arc::new(FFprobeAdapter::new(&config.ffprobe_path)),
            Arc::new(FFplayAdapter::new(&config.ffplay_path)),
            Arc::new(FFmpegAdapter::new(
                &config.ffmpeg_path,
                &config.video_codec,
                &config.audio_codec,
            )),
            config,
        )
    }

    /// Wire caller-provided ports
    pub fn with_ports(
        store_port: Arc<dyn DocumentStorePort>,
        probe_port: Arc<dyn ProbePort>,
        playback_port: Arc<dyn PlaybackPort>,
        export_port: Arc<dyn ConcatExportPort>,
        config: &AppConfig,
    ) -> Self {
        let engine = RouteEngine::with_max_depth(config.max_route_depth);

        let edit_interactor = Arc::new(EditInteractor::new(
            Arc::clone(&store_port),
            engine.clone(),
        ));

        let sequence_interactor = Arc::new(SequenceInteractor::new(
            Arc::clone(&store_port),
            engine.clone(),
        ));

        let export_interactor = Arc::new(ExportInteractor::new(
            Arc::clone(&store_port),
            Arc::clone(&probe_port),
            Arc::clone(&playback_port),
            Arc::clone(&export_port),
            engine,
            config.overwrite,
        ));

        Self {
            edit_interactor,
            sequence_interactor,
            export_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn edit_interactor(&self) -> Arc<EditInteractor> {
        Arc::clone(&self.edit_interactor)
    }

    fn sequence_interactor(&self) -> Arc<SequenceInteractor> {
        Arc::clone(&self.sequence_interactor)
    }

    fn export_interactor(&self) -> Arc<ExportInteractor> {
        Arc::clone(&self.export_interactor)
    }
}
