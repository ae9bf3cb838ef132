// SPDX-License-Identifier: MIT OR Apache-2.0

//! State of the permission editor page.
//!
//! The editor loads the template once, lets the user pick a role, restores the permissions
//! stored for it and keeps the selection consistent while the user toggles nodes. Every
//! failure is logged, reported through the injected [`Notifier`] and returned to the caller,
//! the editor itself always stays in a usable state.
//!
//! ```text
//! Unloaded -> TreeLoaded -> RoleSelected <-> Saving
//!                               ^    |
//!                               +----+ toggle, role change
//! ```
use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

use rolemenu_tree::{
    PermissionTree, Role, RoleId, SelectionSet, TreeError, TreeNode, apply_role_template,
};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::notify::{Notification, Notifier};
use crate::source::{Classify, FailureKind, MenuSource, PersistenceSink, RoleSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    /// No template loaded yet.
    Unloaded,

    /// Template loaded, no role picked.
    TreeLoaded,

    /// A role is picked and its selection can be edited.
    RoleSelected,

    /// The selection of a role is being stored.
    Saving,
}

/// Operation of the editor a failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorOperation {
    LoadTree,
    LoadRoles,
    LoadRolePermissions,
    Save,
}

impl Display for EditorOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EditorOperation::LoadTree => "loading the permission tree",
            EditorOperation::LoadRoles => "loading roles",
            EditorOperation::LoadRolePermissions => "loading role permissions",
            EditorOperation::Save => "saving the selection",
        };

        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{kind} failure while {operation}: {source}")]
    Source {
        operation: EditorOperation,
        kind: FailureKind,
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },

    #[error("template is not a valid permission tree: {0}")]
    InvalidTree(#[from] TreeError),

    #[error("no role selected")]
    NoRoleSelected,

    #[error("saving is already in progress")]
    SaveInFlight,

    #[error("permissions of role {0} are still loading")]
    RoleLoadPending(RoleId),
}

impl EditorError {
    fn from_source<E>(operation: EditorOperation, err: E) -> Self
    where
        E: Error + Classify + Send + Sync + 'static,
    {
        Self::Source {
            operation,
            kind: err.kind(),
            source: Box::new(err),
        }
    }
}

impl Classify for EditorError {
    fn kind(&self) -> FailureKind {
        match self {
            EditorError::Source { kind, .. } => *kind,
            EditorError::InvalidTree(_) => FailureKind::Parse,
            EditorError::NoRoleSelected
            | EditorError::SaveInFlight
            | EditorError::RoleLoadPending(_) => FailureKind::Validation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Unloaded,
    TreeLoaded,
    RoleSelected,
}

#[derive(Debug)]
struct EditorData {
    phase: Phase,
    tree: PermissionTree,
    expanded: Vec<String>,
    roles: Vec<Role>,
    loading_roles: bool,
    /// Role the current selection belongs to.
    selected_role: Option<RoleId>,
    selection: SelectionSet,
    /// Role whose permissions are being fetched, with the generation of the request.
    loading_role: Option<(RoleId, u64)>,
    /// Bumped by every role change and every toggle. Role permissions arriving for an older
    /// generation are dropped.
    generation: u64,
    saving: bool,
}

impl EditorData {
    fn new() -> Self {
        Self {
            phase: Phase::Unloaded,
            tree: PermissionTree::default(),
            expanded: Vec::new(),
            roles: Vec::new(),
            loading_roles: false,
            selected_role: None,
            selection: SelectionSet::new(),
            loading_role: None,
            generation: 0,
            saving: false,
        }
    }

    fn state(&self) -> EditorState {
        if self.saving {
            return EditorState::Saving;
        }

        match self.phase {
            Phase::Unloaded => EditorState::Unloaded,
            Phase::TreeLoaded => EditorState::TreeLoaded,
            Phase::RoleSelected => EditorState::RoleSelected,
        }
    }
}

/// Permission editor of one page instance.
///
/// Cloning is cheap, all clones share the same state.
pub struct PermissionEditor<M, R, P>
where
    M: MenuSource,
    R: RoleSource,
    P: PersistenceSink,
{
    inner: Arc<Inner<M, R, P>>,
}

struct Inner<M, R, P> {
    config: ClientConfig,
    menu: M,
    roles: R,
    sink: P,
    notifier: Box<dyn Notifier>,
    data: RwLock<EditorData>,
}

impl<M, R, P> Clone for PermissionEditor<M, R, P>
where
    M: MenuSource,
    R: RoleSource,
    P: PersistenceSink,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B> PermissionEditor<B, B, B>
where
    B: MenuSource + RoleSource + PersistenceSink + Clone,
{
    /// Editor using one backend for all collaborators.
    pub fn from_backend(config: ClientConfig, backend: B, notifier: impl Notifier) -> Self {
        Self::new(config, backend.clone(), backend.clone(), backend, notifier)
    }
}

impl<M, R, P> PermissionEditor<M, R, P>
where
    M: MenuSource,
    R: RoleSource,
    P: PersistenceSink,
{
    pub fn new(config: ClientConfig, menu: M, roles: R, sink: P, notifier: impl Notifier) -> Self {
        let inner = Inner {
            config,
            menu,
            roles,
            sink,
            notifier: Box::new(notifier),
            data: RwLock::new(EditorData::new()),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Load the template and the roles, in this order.
    ///
    /// A failing template does not prevent the roles from loading. The first error is
    /// returned.
    pub async fn mount(&self) -> Result<(), EditorError> {
        let tree = self.load_tree().await;
        let roles = self.load_roles().await;
        tree.and(roles)
    }

    /// Fetch the template and expand all of its branches.
    pub async fn load_tree(&self) -> Result<(), EditorError> {
        let nodes = match self.inner.menu.menu_items().await {
            Ok(nodes) => nodes,
            Err(err) => match (&self.inner.config.fallback_menu, err.kind()) {
                (Some(fallback), FailureKind::Network) => {
                    warn!("template unavailable, using fallback menu: {err}");
                    fallback.clone()
                }
                _ => {
                    return Err(self.fail(
                        EditorError::from_source(EditorOperation::LoadTree, err),
                        "Could not load the permission tree",
                    ));
                }
            },
        };

        let tree = match PermissionTree::new(nodes) {
            Ok(tree) => tree,
            Err(err) => {
                return Err(self.fail(err.into(), "Could not load the permission tree"));
            }
        };

        let mut data = self.inner.data.write().await;
        data.expanded = tree.expandable_paths();
        debug!(
            roots = tree.roots().len(),
            expanded = data.expanded.len(),
            "permission tree loaded"
        );
        data.tree = tree;
        if data.phase == Phase::Unloaded {
            data.phase = Phase::TreeLoaded;
        }

        Ok(())
    }

    /// Fetch the roles permissions can be assigned to.
    pub async fn load_roles(&self) -> Result<(), EditorError> {
        self.inner.data.write().await.loading_roles = true;

        let result = self.inner.roles.roles().await;

        let mut data = self.inner.data.write().await;
        data.loading_roles = false;

        match result {
            Ok(roles) => {
                debug!(roles = roles.len(), "roles loaded");
                data.roles = roles;
                Ok(())
            }
            Err(err) => {
                drop(data);
                Err(self.fail(
                    EditorError::from_source(EditorOperation::LoadRoles, err),
                    "Could not load roles",
                ))
            }
        }
    }

    /// Switch to another role and restore the permissions stored for it.
    ///
    /// Invalid role ids are ignored. The role becomes the selected one together with its
    /// permissions, once they arrived. When loading fails the selection falls back to the root
    /// path only. A response which arrives after a newer role change or toggle is dropped and
    /// the previous role stays selected.
    pub async fn select_role(&self, role: RoleId) -> Result<(), EditorError> {
        if !role.is_valid() {
            debug!(%role, "ignoring invalid role id");
            return Ok(());
        }

        let generation = {
            let mut data = self.inner.data.write().await;
            let generation = data.generation + 1;
            data.generation = generation;
            data.loading_role = Some((role, generation));
            generation
        };

        let result = self.inner.menu.role_menu(role).await;

        let mut data = self.inner.data.write().await;
        if data.loading_role != Some((role, generation)) {
            debug!(%role, generation, current = data.generation, "dropping stale role permissions");
            return Ok(());
        }

        data.loading_role = None;
        data.selected_role = Some(role);
        data.phase = Phase::RoleSelected;

        match result {
            Ok(stored) => {
                data.selection = apply_role_template(role, &stored);
                Ok(())
            }
            Err(err) => {
                data.selection = SelectionSet::root_only();
                drop(data);
                Err(self.fail(
                    EditorError::from_source(EditorOperation::LoadRolePermissions, err),
                    "Could not load the menu of this role",
                ))
            }
        }
    }

    /// Apply the selection reported by the tree widget after a single toggle.
    ///
    /// Returns the reconciled selection, which replaces the current one. A pending role change
    /// is abandoned, the edited selection stays with the role it belongs to.
    pub async fn toggle(&self, ticked: SelectionSet) -> SelectionSet {
        let mut data = self.inner.data.write().await;

        let selection = data.tree.apply_toggle(&data.selection, ticked);
        data.selection = selection.clone();
        data.generation += 1;
        if let Some((role, _)) = data.loading_role.take() {
            debug!(%role, "toggle abandons pending role change");
        }

        selection
    }

    /// Store the current selection for the selected role.
    ///
    /// The selection is kept when saving fails so it can be retried.
    pub async fn save(&self) -> Result<(), EditorError> {
        let (role, subtree) = {
            let mut data = self.inner.data.write().await;

            let Some(role) = data.selected_role.filter(RoleId::is_valid) else {
                drop(data);
                return Err(self.fail(EditorError::NoRoleSelected, "Please select a role"));
            };

            if data.saving {
                drop(data);
                return Err(self.fail(EditorError::SaveInFlight, "Saving is already in progress"));
            }

            if let Some((pending, _)) = data.loading_role {
                drop(data);
                return Err(self.fail(
                    EditorError::RoleLoadPending(pending),
                    "The permissions of the selected role are still loading",
                ));
            }

            data.saving = true;
            let subtree = data
                .tree
                .selected_subtree(&data.selection, self.inner.config.subtree_depth);

            (role, subtree)
        };

        debug!(%role, roots = subtree.len(), "saving selection");
        let result = self.inner.sink.save_role_menu(role, subtree).await;

        self.inner.data.write().await.saving = false;

        match result {
            Ok(()) => {
                self.inner
                    .notifier
                    .notify(Notification::positive("Selection saved"));
                Ok(())
            }
            Err(err) => Err(self.fail(
                EditorError::from_source(EditorOperation::Save, err),
                "Could not save the selection",
            )),
        }
    }

    /// The current selection projected onto the template, as it would be stored.
    pub async fn selected_subtree(&self) -> Vec<TreeNode> {
        let data = self.inner.data.read().await;
        data.tree
            .selected_subtree(&data.selection, self.inner.config.subtree_depth)
    }

    pub async fn state(&self) -> EditorState {
        self.inner.data.read().await.state()
    }

    pub async fn selection(&self) -> SelectionSet {
        self.inner.data.read().await.selection.clone()
    }

    pub async fn tree(&self) -> PermissionTree {
        self.inner.data.read().await.tree.clone()
    }

    /// Paths of all branches, expanded after the template was loaded.
    pub async fn expanded(&self) -> Vec<String> {
        self.inner.data.read().await.expanded.clone()
    }

    pub async fn roles(&self) -> Vec<Role> {
        self.inner.data.read().await.roles.clone()
    }

    /// Role the current selection belongs to.
    pub async fn selected_role(&self) -> Option<RoleId> {
        self.inner.data.read().await.selected_role
    }

    /// Role whose permissions are being fetched, if any.
    pub async fn loading_role(&self) -> Option<RoleId> {
        self.inner.data.read().await.loading_role.map(|(role, _)| role)
    }

    pub async fn is_saving(&self) -> bool {
        self.inner.data.read().await.saving
    }

    pub async fn is_loading_roles(&self) -> bool {
        self.inner.data.read().await.loading_roles
    }

    fn fail(&self, err: EditorError, message: &str) -> EditorError {
        warn!("{err}");

        let notification = match err.kind() {
            FailureKind::Validation => Notification::warning(message),
            FailureKind::Network | FailureKind::Parse => Notification::negative(message),
        };
        self.inner.notifier.notify(notification);

        err
    }
}
