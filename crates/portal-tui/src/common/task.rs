use tokio_util::sync::CancellationToken;

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
    /// Browser consent, loopback redirect, code exchange.
    GoogleSignIn,
    /// Turning an `AuthOutcome` into a persisted profile.
    ResolveSession,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
    }

    /// Clears the slot if `id` is the active task. Stale completions return false.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub google_sign_in: TaskState,
    pub resolve_session: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::GoogleSignIn => &self.google_sign_in,
            TaskKind::ResolveSession => &self.resolve_session,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::GoogleSignIn => &mut self.google_sign_in,
            TaskKind::ResolveSession => &mut self.resolve_session,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.google_sign_in.is_running() || self.resolve_session.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut seq = TaskSeq::default();
        let mut tasks = Tasks::default();
        let first = seq.next_id();
        let second = seq.next_id();

        tasks.state_mut(TaskKind::GoogleSignIn).on_started(&TaskStarted {
            id: second,
            cancel: Some(CancellationToken::new()),
        });

        assert!(tasks.is_any_running());
        assert!(!tasks.google_sign_in.finish_if_active(first));
        assert!(tasks.google_sign_in.finish_if_active(second));
        assert!(tasks.state(TaskKind::GoogleSignIn).cancel.is_none());
        assert!(!tasks.is_any_running());
    }
}
