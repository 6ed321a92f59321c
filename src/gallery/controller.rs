//! Gallery state and the sync state machine that drives it.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::config::GalleryConfig;
use crate::error::FailureKind;
use crate::tasks::{SyncOp, SyncTaskManager, TaskCompletion};

use super::client::GalleryApi;
use super::dialog::{DialogAction, DialogConfig, DialogOutcome, DialogPresenter, PictureForm};
use super::filter::{recompute, FilterSet};
use super::model::{Picture, Snapshot};
use super::notice::{Notice, NoticeKind};
use super::tags::TagIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Pending(SyncOp),
    Refreshed,
    Failed(FailureKind),
}

/// Everything the panel knows about the gallery. Only the controller
/// mutates it.
#[derive(Debug, Default)]
pub struct GalleryState {
    catalogue: Option<Vec<Picture>>,
    tag_index: TagIndex,
    filter: FilterSet,
    /// Catalogue positions of the pictures passing the filter
    filtered: Vec<usize>,
    last_synced: Option<DateTime<Local>>,
    last_error: Option<String>,
}

impl GalleryState {
    /// `false` until the first list call succeeded.
    pub fn is_loaded(&self) -> bool {
        self.catalogue.is_some()
    }

    /// The catalogue, empty while not loaded.
    pub fn catalogue(&self) -> &[Picture] {
        self.catalogue.as_deref().unwrap_or(&[])
    }

    pub fn picture(&self, id: usize) -> Option<&Picture> {
        self.catalogue().get(id)
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.tag_index
    }

    pub fn filter(&self) -> &FilterSet {
        &self.filter
    }

    /// Pictures passing the active filter, in catalogue order.
    pub fn filtered_view(&self) -> Vec<&Picture> {
        let catalogue = self.catalogue();
        self.filtered
            .iter()
            .filter_map(|idx| catalogue.get(*idx))
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn last_synced(&self) -> Option<DateTime<Local>> {
        self.last_synced
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let pictures = Snapshot::from_ordered(snapshot.pictures).pictures;
        self.tag_index.rebuild_from(&pictures);
        self.catalogue = Some(pictures);
        self.last_synced = Some(Local::now());
        self.last_error = None;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = recompute(self.catalogue(), &self.filter)
            .into_iter()
            .map(|p| p.id)
            .collect();
    }
}

/// Owns the gallery state, starts remote calls for confirmed dialogs and
/// applies their results.
pub struct GalleryController {
    api: Arc<dyn GalleryApi>,
    config: GalleryConfig,
    state: GalleryState,
    status: SyncStatus,
    tasks: SyncTaskManager,
    notices: VecDeque<Notice>,
}

impl GalleryController {
    pub fn new(api: Arc<dyn GalleryApi>, config: GalleryConfig) -> Self {
        Self {
            api,
            config,
            state: GalleryState::default(),
            status: SyncStatus::Idle,
            tasks: SyncTaskManager::new(),
            notices: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.tasks.is_busy()
    }

    /// Fetch the catalogue. Used on startup and when the user asks for a
    /// reload; failures are never retried automatically.
    pub fn refresh(&mut self) -> bool {
        tracing::debug!("query gallery metadata");
        self.dispatch(SyncOp::List, |api| api.list())
    }

    /// Dialog settings for the add/edit form, with the current tag vocabulary.
    pub fn dialog_config(&self, action: DialogAction) -> DialogConfig {
        DialogConfig::new(action, &self.config, self.state.tag_index.to_vec())
    }

    /// Apply the answer of the add dialog. Returns true if a call was started.
    pub fn add_picture(&mut self, outcome: DialogOutcome<PictureForm>) -> bool {
        let Some(form) = outcome.into_option() else {
            return false;
        };
        let data = form.into_data();
        tracing::debug!(?data, "add form result");
        self.dispatch(SyncOp::Create, move |api| api.create(&data))
    }

    /// Apply the answer of the edit dialog. Returns true if a call was started.
    pub fn edit_picture(&mut self, outcome: DialogOutcome<PictureForm>) -> bool {
        let Some(form) = outcome.into_option() else {
            return false;
        };
        let Some(picture) = form.into_picture() else {
            tracing::warn!("edit form result without picture id ignored");
            return false;
        };
        tracing::debug!(?picture, "edit form result");
        self.dispatch(SyncOp::Update, move |api| api.update(&picture))
    }

    /// Apply the answer of the delete dialog. Returns true if a call was started.
    pub fn delete_picture(&mut self, outcome: DialogOutcome<usize>) -> bool {
        let Some(id) = outcome.into_option() else {
            return false;
        };
        tracing::debug!(id, "delete form result");
        self.dispatch(SyncOp::Delete, move |api| api.delete(id))
    }

    /// Present the add dialog and apply its answer.
    pub fn run_add(&mut self, presenter: &mut dyn DialogPresenter) -> bool {
        let config = self.dialog_config(DialogAction::Add);
        let outcome = presenter.present_picture(&config, PictureForm::blank());
        self.add_picture(outcome)
    }

    /// Present the edit dialog for picture `id` and apply its answer.
    pub fn run_edit(&mut self, presenter: &mut dyn DialogPresenter, id: usize) -> bool {
        let Some(picture) = self.state.picture(id) else {
            return false;
        };
        let initial = PictureForm::from_picture(picture);
        let config = self.dialog_config(DialogAction::Edit);
        let outcome = presenter.present_picture(&config, initial);
        self.edit_picture(outcome)
    }

    /// Present the delete confirmation for picture `id` and apply its answer.
    pub fn run_delete(&mut self, presenter: &mut dyn DialogPresenter, id: usize) -> bool {
        let Some(picture) = self.state.picture(id) else {
            return false;
        };
        let outcome = presenter.present_delete(picture);
        self.delete_picture(outcome)
    }

    pub fn add_filter_tag(&mut self, tag: &str) {
        if self.state.filter.add(tag) {
            self.state.refilter();
        }
    }

    pub fn remove_filter_tag(&mut self, tag: &str) {
        if self.state.filter.remove(tag) {
            self.state.refilter();
        }
    }

    pub fn clear_filters(&mut self) {
        self.state.filter.clear();
        self.state.refilter();
    }

    /// Apply a finished call if there is one. Call from the event loop.
    pub fn poll_updates(&mut self) -> bool {
        match self.tasks.poll_updates() {
            Some(completion) => {
                self.apply_completion(completion);
                true
            }
            None => false,
        }
    }

    /// Block until the running call finishes and apply it.
    pub fn wait_for_sync(&mut self) -> bool {
        match self.tasks.wait() {
            Some(completion) => {
                self.apply_completion(completion);
                true
            }
            None => false,
        }
    }

    /// Take all pending notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn dispatch<F>(&mut self, op: SyncOp, call: F) -> bool
    where
        F: FnOnce(&dyn GalleryApi) -> Result<Snapshot, crate::error::GalleryError> + Send + 'static,
    {
        if self.tasks.start(op, Arc::clone(&self.api), call).is_none() {
            if op.is_mutation() {
                self.notify(NoticeKind::Error, "Another change is still syncing, try again");
            }
            return false;
        }
        self.status = SyncStatus::Pending(op);
        true
    }

    fn apply_completion(&mut self, completion: TaskCompletion) {
        let op = completion.op;
        match completion.result {
            Ok(snapshot) => {
                tracing::info!(?op, pictures = snapshot.len(), "gallery metadata refreshed");
                self.state.apply_snapshot(snapshot);
                self.status = SyncStatus::Refreshed;
                if let Some(message) = success_message(op) {
                    self.notify(NoticeKind::Success, message);
                }
            }
            Err(error) => {
                tracing::error!(?op, error = %error, "gallery request error");
                self.status = SyncStatus::Failed(error.kind());
                if op.is_mutation() {
                    let message = if error.is_unauthorized() {
                        "ERROR - User unauthorized".to_string()
                    } else {
                        format!("ERROR - {} call in error", op.method())
                    };
                    self.notify(NoticeKind::Error, message);
                }
                self.state.last_error = Some(error.to_string());
            }
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let duration = Duration::from_millis(self.config.notice_duration_ms);
        self.notices.push_back(Notice::new(kind, message, duration));
    }
}

fn success_message(op: SyncOp) -> Option<&'static str> {
    match op {
        SyncOp::List => None,
        SyncOp::Create => Some("New picture added"),
        SyncOp::Update => Some("Picture edited"),
        SyncOp::Delete => Some("Picture deleted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;
    use crate::gallery::PictureData;
    use std::sync::mpsc;
    use std::sync::Mutex;

    /// Answers calls from a script and records what was asked.
    #[derive(Default)]
    struct ScriptedApi {
        calls: Mutex<Vec<String>>,
        responses: Mutex<VecDeque<Result<Snapshot, GalleryError>>>,
        hold: Mutex<Option<mpsc::Receiver<()>>>,
    }

    impl ScriptedApi {
        fn with(responses: Vec<Result<Snapshot, GalleryError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, call: String) -> Result<Snapshot, GalleryError> {
            self.calls.lock().unwrap().push(call);
            if let Some(gate) = self.hold.lock().unwrap().as_ref() {
                let _ = gate.recv();
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Snapshot::default()))
        }
    }

    impl GalleryApi for ScriptedApi {
        fn list(&self) -> Result<Snapshot, GalleryError> {
            self.answer("list".to_string())
        }

        fn create(&self, payload: &PictureData) -> Result<Snapshot, GalleryError> {
            self.answer(format!("create {}", payload.name))
        }

        fn update(&self, payload: &Picture) -> Result<Snapshot, GalleryError> {
            self.answer(format!("update {} {}", payload.id, payload.name))
        }

        fn delete(&self, id: usize) -> Result<Snapshot, GalleryError> {
            self.answer(format!("delete {}", id))
        }
    }

    struct FixedPresenter {
        picture: DialogOutcome<PictureForm>,
        delete: DialogOutcome<usize>,
        shown: Vec<(DialogAction, PictureForm)>,
    }

    impl FixedPresenter {
        fn cancelling() -> Self {
            Self {
                picture: DialogOutcome::Cancelled,
                delete: DialogOutcome::Cancelled,
                shown: Vec::new(),
            }
        }
    }

    impl DialogPresenter for FixedPresenter {
        fn present_picture(
            &mut self,
            config: &DialogConfig,
            initial: PictureForm,
        ) -> DialogOutcome<PictureForm> {
            self.shown.push((config.action, initial));
            self.picture.clone()
        }

        fn present_delete(&mut self, _picture: &Picture) -> DialogOutcome<usize> {
            self.delete.clone()
        }
    }

    fn picture(id: usize, name: &str, tags: &[&str], file: &str) -> Picture {
        Picture {
            id,
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            file: file.to_string(),
        }
    }

    fn snapshot(pictures: Vec<Picture>) -> Snapshot {
        Snapshot { pictures }
    }

    fn unauthorized() -> GalleryError {
        GalleryError::Unauthorized {
            method: "POST",
            url: "test".to_string(),
        }
    }

    fn loaded(api: Arc<ScriptedApi>) -> GalleryController {
        let mut controller = GalleryController::new(api, GalleryConfig::default());
        assert!(controller.refresh());
        assert!(controller.wait_for_sync());
        controller
    }

    #[test]
    fn test_startup_seeds_state() {
        let api = ScriptedApi::with(vec![Ok(snapshot(vec![
            picture(5, "A", &["x", "y"], "a.png"),
            picture(5, "B", &["y"], "b.png"),
        ]))]);
        let controller = loaded(api);

        assert_eq!(controller.status(), SyncStatus::Refreshed);
        let ids: Vec<usize> = controller.state().catalogue().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(controller.state().tag_index().to_vec(), vec!["x", "y"]);
        assert_eq!(controller.state().filtered_view().len(), 2);
    }

    #[test]
    fn test_startup_failure_leaves_catalogue_unset() {
        let api = ScriptedApi::with(vec![Err(GalleryError::Transport {
            method: "GET",
            url: "test".to_string(),
            message: "connection refused".to_string(),
        })]);
        let mut controller = loaded(api);

        assert_eq!(controller.status(), SyncStatus::Failed(FailureKind::Transport));
        assert!(!controller.state().is_loaded());
        assert!(controller.state().catalogue().is_empty());
        assert!(controller.state().filtered_view().is_empty());
        assert!(controller.state().last_error().is_some());
        assert!(controller.drain_notices().is_empty());
    }

    #[test]
    fn test_pending_until_completed() {
        let (release, gate) = mpsc::channel();
        let api = ScriptedApi::with(vec![Ok(snapshot(vec![]))]);
        *api.hold.lock().unwrap() = Some(gate);
        let mut controller = GalleryController::new(api, GalleryConfig::default());

        assert!(controller.refresh());
        assert_eq!(controller.status(), SyncStatus::Pending(SyncOp::List));
        assert!(!controller.poll_updates());

        release.send(()).unwrap();
        assert!(controller.wait_for_sync());
        assert_eq!(controller.status(), SyncStatus::Refreshed);
    }

    #[test]
    fn test_filter_scenario() {
        let api = ScriptedApi::with(vec![Ok(snapshot(vec![picture(0, "A", &["x", "y"], "a.png")]))]);
        let mut controller = loaded(api);

        controller.add_filter_tag("x");
        let names: Vec<&str> = controller
            .state()
            .filtered_view()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["A"]);

        controller.add_filter_tag("z");
        assert!(controller.state().filtered_view().is_empty());

        controller.remove_filter_tag("z");
        assert_eq!(controller.state().filtered_len(), 1);

        controller.clear_filters();
        assert!(controller.state().filter().is_empty());
    }

    #[test]
    fn test_delete_keeps_known_tags() {
        let api = ScriptedApi::with(vec![
            Ok(snapshot(vec![picture(0, "A", &["x", "y"], "a.png")])),
            Ok(snapshot(vec![])),
        ]);
        let mut controller = loaded(Arc::clone(&api));

        assert!(controller.delete_picture(DialogOutcome::Confirmed(0)));
        assert!(controller.wait_for_sync());

        assert!(controller.state().is_loaded());
        assert!(controller.state().catalogue().is_empty());
        assert!(controller.state().tag_index().contains("x"));
        assert!(controller.state().tag_index().contains("y"));
        assert_eq!(api.calls(), vec!["list", "delete 0"]);

        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Success);
    }

    #[test]
    fn test_create_unauthorized_keeps_catalogue() {
        let api = ScriptedApi::with(vec![
            Ok(snapshot(vec![picture(0, "A", &["x"], "a.png")])),
            Err(unauthorized()),
        ]);
        let mut controller = loaded(api);
        let before = controller.state().catalogue().to_vec();

        let form = PictureForm {
            id: None,
            name: "Boat".to_string(),
            tags: vec!["sea".to_string()],
            file: "boat.png".to_string(),
        };
        assert!(controller.add_picture(DialogOutcome::Confirmed(form)));
        assert!(controller.wait_for_sync());

        assert_eq!(controller.status(), SyncStatus::Failed(FailureKind::Unauthorized));
        assert_eq!(controller.state().catalogue(), before.as_slice());
        assert!(!controller.state().tag_index().contains("sea"));

        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert_eq!(notices[0].message, "ERROR - User unauthorized");
    }

    #[test]
    fn test_other_failure_has_generic_notice() {
        let api = ScriptedApi::with(vec![
            Ok(snapshot(vec![picture(0, "A", &[], "a.png")])),
            Err(GalleryError::RequestFailed {
                method: "PUT",
                url: "test".to_string(),
                status: 500,
            }),
        ]);
        let mut controller = loaded(api);

        let mut form = PictureForm::from_picture(&controller.state().catalogue()[0]);
        form.name = "Renamed".to_string();
        assert!(controller.edit_picture(DialogOutcome::Confirmed(form)));
        assert!(controller.wait_for_sync());

        assert_eq!(controller.status(), SyncStatus::Failed(FailureKind::Request));
        assert_eq!(controller.state().catalogue()[0].name, "A");
        let notices = controller.drain_notices();
        assert_eq!(notices[0].message, "ERROR - PUT call in error");
    }

    #[test]
    fn test_successful_mutation_replaces_catalogue() {
        let api = ScriptedApi::with(vec![
            Ok(snapshot(vec![picture(0, "A", &["x"], "a.png")])),
            Ok(snapshot(vec![
                picture(3, "A", &["x"], "a.png"),
                picture(3, "Boat", &["sea"], "boat.png"),
            ])),
        ]);
        let mut controller = loaded(Arc::clone(&api));
        controller.add_filter_tag("sea");
        assert_eq!(controller.state().filtered_len(), 0);

        let form = PictureForm {
            id: Some(9),
            name: "Boat".to_string(),
            tags: vec!["sea".to_string()],
            file: "boat.png".to_string(),
        };
        assert!(controller.add_picture(DialogOutcome::Confirmed(form)));
        assert!(controller.wait_for_sync());

        assert_eq!(
            controller.state().catalogue(),
            &[
                picture(0, "A", &["x"], "a.png"),
                picture(1, "Boat", &["sea"], "boat.png"),
            ]
        );
        assert_eq!(controller.state().filtered_len(), 1);
        assert!(controller.state().tag_index().contains("sea"));
        assert!(controller.state().last_synced().is_some());
        assert_eq!(api.calls(), vec!["list", "create Boat"]);
    }

    #[test]
    fn test_cancelled_dialogs_make_no_calls() {
        let api = ScriptedApi::with(vec![Ok(snapshot(vec![picture(0, "A", &["x"], "a.png")]))]);
        let mut controller = loaded(Arc::clone(&api));
        let mut presenter = FixedPresenter::cancelling();

        assert!(!controller.run_add(&mut presenter));
        assert!(!controller.run_edit(&mut presenter, 0));
        assert!(!controller.run_delete(&mut presenter, 0));

        assert_eq!(api.calls(), vec!["list"]);
        assert_eq!(controller.status(), SyncStatus::Refreshed);
        assert!(!controller.is_busy());
        assert!(controller.drain_notices().is_empty());
    }

    #[test]
    fn test_presenter_receives_initial_values() {
        let api = ScriptedApi::with(vec![Ok(snapshot(vec![picture(0, "A", &["x"], "a.png")]))]);
        let mut controller = loaded(api);
        let mut presenter = FixedPresenter::cancelling();

        controller.run_add(&mut presenter);
        controller.run_edit(&mut presenter, 0);
        assert!(!controller.run_edit(&mut presenter, 7));

        assert_eq!(presenter.shown.len(), 2);
        assert_eq!(presenter.shown[0], (DialogAction::Add, PictureForm::blank()));
        assert_eq!(presenter.shown[1].0, DialogAction::Edit);
        assert_eq!(presenter.shown[1].1.id, Some(0));
        assert_eq!(presenter.shown[1].1.name, "A");
    }

    #[test]
    fn test_confirmed_delete_through_presenter() {
        let api = ScriptedApi::with(vec![
            Ok(snapshot(vec![picture(0, "A", &[], "a.png"), picture(1, "B", &[], "b.png")])),
            Ok(snapshot(vec![picture(0, "B", &[], "b.png")])),
        ]);
        let mut controller = loaded(Arc::clone(&api));
        let mut presenter = FixedPresenter {
            delete: DialogOutcome::Confirmed(0),
            ..FixedPresenter::cancelling()
        };

        assert!(controller.run_delete(&mut presenter, 0));
        assert!(controller.wait_for_sync());
        assert_eq!(controller.state().catalogue(), &[picture(0, "B", &[], "b.png")]);
        assert_eq!(api.calls(), vec!["list", "delete 0"]);
    }

    #[test]
    fn test_second_mutation_refused_while_pending() {
        let (release, gate) = mpsc::channel();
        let api = ScriptedApi::with(vec![
            Ok(snapshot(vec![picture(0, "A", &[], "a.png")])),
            Ok(snapshot(vec![])),
        ]);
        let mut controller = loaded(Arc::clone(&api));
        *api.hold.lock().unwrap() = Some(gate);

        assert!(controller.delete_picture(DialogOutcome::Confirmed(0)));
        assert!(!controller.delete_picture(DialogOutcome::Confirmed(0)));
        assert_eq!(controller.status(), SyncStatus::Pending(SyncOp::Delete));

        release.send(()).unwrap();
        assert!(controller.wait_for_sync());
        assert_eq!(api.calls(), vec!["list", "delete 0"]);

        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert_eq!(notices[1].kind, NoticeKind::Success);
    }

    #[test]
    fn test_dialog_config_carries_known_tags() {
        let api = ScriptedApi::with(vec![Ok(snapshot(vec![picture(0, "A", &["y", "x"], "a.png")]))]);
        let controller = loaded(api);
        let config = controller.dialog_config(DialogAction::Edit);
        assert_eq!(config.known_tags, vec!["x", "y"]);
        assert_eq!(config.max_name_length, 25);
    }
}
