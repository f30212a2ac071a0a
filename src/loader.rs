//! Background feed loading and the atomic registry swap.
//!
//! A load runs on the async compute pool so the animation keeps running on the
//! previous data set. When it completes, the whole registry is replaced in one
//! step. A failed load leaves the previous registry untouched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::futures_lite::future;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};
use chrono::Utc;

use crate::feed::{date_ranges, load_feed, FeedError, FetchWindow, NeoRecord, NeoWsClient};
use crate::sim::{build_registry, NeoRegistry, VisibilityToggles};
use crate::types::unix_millis_now;

/// User-facing feed configuration.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedSettings {
    pub api_key: String,
    pub window: FetchWindow,
}

/// Where the most recent load stands.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading { completed: usize, total: usize },
    Loaded { tracked: usize, skipped: usize },
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading { .. })
    }

    /// Percentage of date windows fetched so far.
    pub fn percent(&self) -> Option<u32> {
        match self {
            LoadStatus::Loading { completed, total } if *total > 0 => {
                Some((*completed * 100 / *total) as u32)
            }
            _ => None,
        }
    }
}

/// In-flight fetch task plus a pending request flag set by the UI.
#[derive(Resource, Default)]
pub struct FeedLoader {
    /// Set to start a load on the next frame. Ignored while a load is running.
    pub requested: bool,
    task: Option<Task<Result<Vec<NeoRecord>, FeedError>>>,
    progress: Arc<AtomicUsize>,
}

impl FeedLoader {
    pub fn requesting() -> Self {
        Self {
            requested: true,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

/// Plugin running feed loads in the background.
pub struct LoaderPlugin;

impl Plugin for LoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FeedSettings>()
            .init_resource::<FeedLoader>()
            .init_resource::<LoadStatus>()
            .add_systems(Update, (start_requested_load, poll_feed_task).chain());
    }
}

fn start_requested_load(
    settings: Res<FeedSettings>,
    mut loader: ResMut<FeedLoader>,
    mut status: ResMut<LoadStatus>,
) {
    if !loader.requested || loader.is_running() {
        return;
    }
    loader.requested = false;

    let today = Utc::now().date_naive();
    let window = settings.window;
    let api_key = settings.api_key.clone();
    let progress = Arc::new(AtomicUsize::new(0));
    loader.progress = progress.clone();

    info!("Loading NEO feed for the next {}", window.label());

    let task = AsyncComputeTaskPool::get().spawn(async move {
        NeoWsClient::new(api_key).and_then(|client| {
            load_feed(&client, today, window, |completed, _| {
                progress.store(completed, Ordering::Relaxed)
            })
        })
    });
    loader.task = Some(task);

    *status = LoadStatus::Loading {
        completed: 0,
        total: date_ranges(today, window.days()).len(),
    };
}

fn poll_feed_task(
    mut loader: ResMut<FeedLoader>,
    mut registry: ResMut<NeoRegistry>,
    mut toggles: ResMut<VisibilityToggles>,
    mut status: ResMut<LoadStatus>,
) {
    if !loader.is_running() {
        return;
    }

    let completed = loader.progress.load(Ordering::Relaxed);
    if let LoadStatus::Loading { completed: shown, .. } = &mut *status {
        *shown = completed;
    }

    let Some(task) = loader.task.as_mut() else {
        return;
    };
    let Some(result) = block_on(future::poll_once(task)) else {
        return;
    };
    loader.task = None;

    match result {
        Ok(records) => {
            let report = build_registry(&records, unix_millis_now(), &mut rand::thread_rng());
            let tracked = report.registry.len();
            let skipped = report.skipped.len();
            info!("Tracking {} objects ({} records skipped)", tracked, skipped);

            registry.replace(report.registry);
            *toggles = VisibilityToggles::default();
            *status = LoadStatus::Loaded { tracked, skipped };
        }
        Err(err) => {
            error!("Failed to load asteroid data: {err}");
            *status = LoadStatus::Failed(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_status_percent() {
        assert_eq!(LoadStatus::Idle.percent(), None);
        assert_eq!(
            LoadStatus::Loading {
                completed: 1,
                total: 4
            }
            .percent(),
            Some(25)
        );
        assert!(LoadStatus::Loading {
            completed: 0,
            total: 0
        }
        .is_loading());
    }

    #[test]
    fn test_failed_load_keeps_previous_registry() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<NeoRegistry>()
            .init_resource::<VisibilityToggles>()
            .add_plugins(LoaderPlugin);

        // No API key: the task fails immediately with MissingApiKey.
        app.world_mut().resource_mut::<FeedLoader>().requested = true;

        for _ in 0..200 {
            app.update();
            if !app.world().resource::<FeedLoader>().is_running()
                && !app.world().resource::<FeedLoader>().requested
            {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let status = app.world().resource::<LoadStatus>();
        assert_eq!(status, &LoadStatus::Failed("NASA API key required".to_string()));
        assert_eq!(app.world().resource::<NeoRegistry>().generation(), 0);
    }
}
