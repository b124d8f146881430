use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Catalog,
    Personal,
    Login,
    Admin,
    AdminWithdraw,
    Rating,
}

/// Lifecycle of one kind of background request (mutated only by the reducer).
///
/// Only the most recently started request is active. Results carrying any
/// other id are stale and get dropped.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default)]
pub struct Tasks {
    pub seq: TaskSeq,
    pub catalog: TaskState,
    pub personal: TaskState,
    pub login: TaskState,
    pub admin: TaskState,
    pub admin_withdraw: TaskState,
    pub rating: TaskState,
    /// Workshops whose own register/withdraw is in flight.
    pub workshops: HashSet<String>,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Catalog => &self.catalog,
            TaskKind::Personal => &self.personal,
            TaskKind::Login => &self.login,
            TaskKind::Admin => &self.admin,
            TaskKind::AdminWithdraw => &self.admin_withdraw,
            TaskKind::Rating => &self.rating,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Catalog => &mut self.catalog,
            TaskKind::Personal => &mut self.personal,
            TaskKind::Login => &mut self.login,
            TaskKind::Admin => &mut self.admin,
            TaskKind::AdminWithdraw => &mut self.admin_withdraw,
            TaskKind::Rating => &mut self.rating,
        }
    }

    /// Allocates an id and marks `kind` as running under it.
    pub fn start(&mut self, kind: TaskKind) -> TaskId {
        let id = self.seq.next_id();
        self.state_mut(kind).start(id);
        id
    }

    pub fn finish(&mut self, kind: TaskKind, id: TaskId) -> bool {
        self.state_mut(kind).finish_if_active(id)
    }

    /// Admin controls are locked while the dashboard loads or a withdraw runs.
    pub fn admin_busy(&self) -> bool {
        self.admin.is_running() || self.admin_withdraw.is_running()
    }

    /// Forgets everything tied to the logged-in identity.
    pub fn clear_session(&mut self) {
        self.personal.clear();
        self.admin.clear();
        self.admin_withdraw.clear();
        self.rating.clear();
        self.workshops.clear();
    }

    pub fn is_any_running(&self) -> bool {
        self.catalog.is_running()
            || self.personal.is_running()
            || self.login.is_running()
            || self.admin.is_running()
            || self.admin_withdraw.is_running()
            || self.rating.is_running()
            || !self.workshops.is_empty()
    }
}
