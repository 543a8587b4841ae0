//! Offline replay of pose attribute streams through the presenters.
//!
//! Input is JSON lines, one element snapshot per line, e.g.
//! `{"data-lat": "40.0", "data-lng": "-74.0", ...}`. Numbers are accepted as
//! well as strings. The first snapshot mounts; the rest update.

use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::Pose;
use futures::executor::LocalPool;
use presenters::{PresenterConfig, TransitionOutcome, ViewCoordinator};
use runtime::{Reporter, Severity};
use scene::components::Transform;
use scene::recording::{
    ConstructMode, RecordingGraph, RecordingMapRenderer, RecordingSceneRenderer,
};
use scene::{GoToTarget, MapCenter};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

pub type Element = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub snapshots: usize,
    pub revision: Option<u64>,
    pub pose: Option<Pose>,
    pub map_center: Option<MapCenter>,
    pub scene_target: Option<GoToTarget>,
    pub scene_outcome: Option<String>,
    pub nodes: BTreeMap<String, Transform>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Parses one JSON line into element attributes.
pub fn parse_element(line: &str) -> Result<Element, String> {
    let raw: BTreeMap<String, Value> =
        serde_json::from_str(line).map_err(|e| format!("json: {e}"))?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, text)
        })
        .collect())
}

pub struct Replay {
    pool: LocalPool,
    coordinator: ViewCoordinator<RecordingMapRenderer, RecordingSceneRenderer, RecordingGraph>,
    snapshots: usize,
    last_pose: Option<Pose>,
}

impl Replay {
    pub fn new(config: PresenterConfig) -> Self {
        let pool = LocalPool::new();
        let graph = RecordingGraph::with_nodes([
            config.vr.rig_id.as_str(),
            config.vr.camera_id.as_str(),
            config.vr.compass_id.as_str(),
            config.vr.horizon_id.as_str(),
        ]);
        let coordinator = ViewCoordinator::new(
            RecordingMapRenderer::new(),
            RecordingSceneRenderer::new(ConstructMode::Immediate).auto_completing(),
            graph,
            config,
            Rc::new(pool.spawner()),
            Reporter::new(),
        );
        Self {
            pool,
            coordinator,
            snapshots: 0,
            last_pose: None,
        }
    }

    /// Applies one snapshot and runs the event loop until it is idle.
    pub fn feed(&mut self, element: &Element) -> Pose {
        let pose = if self.snapshots == 0 {
            self.coordinator.mount(element)
        } else {
            self.coordinator.update(element)
        };
        self.pool.run_until_stalled();
        self.snapshots += 1;
        self.last_pose = Some(pose);
        pose
    }

    pub fn report(&self) -> ReplayReport {
        let ctx = self.coordinator.context();
        let scene_view = ctx.scene.view();
        let messages = |severity: Severity| {
            self.coordinator
                .reporter()
                .events()
                .into_iter()
                .filter(|e| e.severity == severity)
                .map(|e| format!("{} {}: {}", e.revision, e.kind, e.message))
                .collect::<Vec<_>>()
        };

        ReplayReport {
            snapshots: self.snapshots,
            revision: self.coordinator.revision().map(|r| r.index),
            pose: self.last_pose,
            map_center: ctx.map.view.as_ref().and_then(|v| v.center()),
            scene_target: scene_view.and_then(|v| v.last_target()),
            scene_outcome: ctx.scene.latest_outcome().map(|s| match s.outcome {
                TransitionOutcome::Completed => "completed".to_string(),
                TransitionOutcome::Superseded => "superseded".to_string(),
                TransitionOutcome::Failed(err) => format!("failed: {err}"),
            }),
            nodes: self.coordinator.vr_presenter().graph().snapshot(),
            warnings: messages(Severity::Warn),
            errors: messages(Severity::Error),
        }
    }
}

/// Replays every non-empty, non-comment line of `input`.
pub fn replay_str(input: &str, config: PresenterConfig) -> Result<ReplayReport, String> {
    let mut replay = Replay::new(config);
    for (n, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let element = parse_element(line).map_err(|e| format!("line {}: {e}", n + 1))?;
        replay.feed(&element);
    }
    info!(snapshots = replay.snapshots, "replay finished");
    Ok(replay.report())
}
