// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for mocking backend implementations.
//!
//! [`MockBackend`] keeps templates, roles and stored permissions in memory, counts how often
//! it was called and can be told to fail or to hold back answers until the test releases
//! them.
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use rolemenu_tree::{Role, RoleId, TreeNode};
use thiserror::Error;
use tokio::sync::{Mutex, oneshot};

use crate::notify::{Notification, NotificationLevel, Notifier};
use crate::source::{Classify, FailureKind, MenuSource, PersistenceSink, RoleSource};

pub use rolemenu_tree::test_utils::setup_logging;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MockCall {
    MenuItems,
    RoleMenu,
    Roles,
    Save,
}

#[derive(Debug, Error)]
#[error("mock {kind} failure in {call:?}")]
pub struct MockError {
    pub call: MockCall,
    pub kind: FailureKind,
}

impl Classify for MockError {
    fn kind(&self) -> FailureKind {
        self.kind
    }
}

#[derive(Debug, Default)]
struct MockBackendState {
    role_menus: HashMap<RoleId, Vec<TreeNode>>,
    saved: Vec<(RoleId, Vec<TreeNode>)>,
    calls: HashMap<MockCall, usize>,
    gates: HashMap<MockCall, oneshot::Receiver<()>>,
}

#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    template: Vec<TreeNode>,
    roles: Vec<Role>,
    failures: HashMap<MockCall, FailureKind>,
    state: Arc<Mutex<MockBackendState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: Vec<TreeNode>) -> Self {
        self.template = template;
        self
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_role_menu(self, role: RoleId, menu: Vec<TreeNode>) -> Self {
        self.state
            .try_lock()
            .expect("mock backend is not in use while being configured")
            .role_menus
            .insert(role, menu);
        self
    }

    /// Answer every call of this kind with an error.
    pub fn fail(mut self, call: MockCall, kind: FailureKind) -> Self {
        self.failures.insert(call, kind);
        self
    }

    /// Hold back the answer of the next call of this kind until the returned sender is used
    /// or dropped.
    pub async fn hold(&self, call: MockCall) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().await.gates.insert(call, rx);
        tx
    }

    /// Number of times a call was made, including failed and held back ones.
    pub async fn calls(&self, call: MockCall) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&call)
            .copied()
            .unwrap_or_default()
    }

    /// Every successfully stored selection, oldest first.
    pub async fn saved(&self) -> Vec<(RoleId, Vec<TreeNode>)> {
        self.state.lock().await.saved.clone()
    }

    async fn enter(&self, call: MockCall) -> Result<(), MockError> {
        let gate = {
            let mut state = self.state.lock().await;
            *state.calls.entry(call).or_default() += 1;
            state.gates.remove(&call)
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match self.failures.get(&call) {
            Some(kind) => Err(MockError { call, kind: *kind }),
            None => Ok(()),
        }
    }
}

impl MenuSource for MockBackend {
    type Error = MockError;

    async fn menu_items(&self) -> Result<Vec<TreeNode>, Self::Error> {
        self.enter(MockCall::MenuItems).await?;
        Ok(self.template.clone())
    }

    async fn role_menu(&self, role: RoleId) -> Result<Vec<TreeNode>, Self::Error> {
        self.enter(MockCall::RoleMenu).await?;
        let state = self.state.lock().await;
        Ok(state.role_menus.get(&role).cloned().unwrap_or_default())
    }
}

impl RoleSource for MockBackend {
    type Error = MockError;

    async fn roles(&self) -> Result<Vec<Role>, Self::Error> {
        self.enter(MockCall::Roles).await?;
        Ok(self.roles.clone())
    }
}

impl PersistenceSink for MockBackend {
    type Error = MockError;

    async fn save_role_menu(&self, role: RoleId, tree: Vec<TreeNode>) -> Result<(), Self::Error> {
        if !role.is_valid() {
            return Err(MockError {
                call: MockCall::Save,
                kind: FailureKind::Validation,
            });
        }

        self.enter(MockCall::Save).await?;

        let mut state = self.state.lock().await;
        state.role_menus.insert(role, tree.clone());
        state.saved.push((role, tree));
        Ok(())
    }
}

/// Notifier remembering everything it was asked to show.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    notifications: Arc<StdMutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|notifications| notifications.clone())
            .unwrap_or_default()
    }

    pub fn levels(&self) -> Vec<NotificationLevel> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.level)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}
