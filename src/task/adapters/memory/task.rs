//! In-memory repository for task board tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        ColumnCounts, DependencyEdge, PendingTransition, Task, TaskChange, TaskDetails,
        TaskFilter, TaskId, TransitionId, TransitionRecord, sort_chronologically,
    },
    ports::{
        AppliedChange, TaskRepository, TaskRepositoryError, TaskRepositoryResult, TransitionLog,
    },
};

/// Thread-safe in-memory task repository and transition log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    edges: BTreeSet<DependencyEdge>,
    transitions: Vec<TransitionRecord>,
    last_transition_id: i64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryTaskState {
    fn append(&mut self, transition: PendingTransition) -> TransitionRecord {
        self.last_transition_id += 1;
        let record = transition.into_record(TransitionId::new(self.last_transition_id));
        self.transitions.push(record.clone());
        record
    }

    /// Checks every dependency of `owner` names a stored task or `owner`
    /// itself.
    fn ensure_dependencies_exist(
        &self,
        owner: &TaskId,
        dependencies: &BTreeSet<TaskId>,
    ) -> TaskRepositoryResult<()> {
        let missing = dependencies
            .iter()
            .find(|id| *id != owner && !self.tasks.contains_key(*id));
        match missing {
            Some(missing) => Err(TaskRepositoryError::DependencyNotFound(missing.clone())),
            None => Ok(()),
        }
    }

    fn replace_dependencies(&mut self, task_id: &TaskId, dependencies: &BTreeSet<TaskId>) {
        self.edges.retain(|edge| &edge.task_id != task_id);
        self.edges.extend(
            dependencies
                .iter()
                .map(|depends_on| DependencyEdge::new(task_id.clone(), depends_on.clone())),
        );
    }

    fn details(&self, task: &Task) -> TaskDetails {
        let dependencies = self
            .edges
            .iter()
            .filter(|edge| &edge.task_id == task.id())
            .map(|edge| edge.depends_on.clone())
            .collect();
        TaskDetails::new(task.clone(), dependencies)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(
        &self,
        task: &Task,
        transition: &PendingTransition,
        dependencies: &BTreeSet<TaskId>,
    ) -> TaskRepositoryResult<TransitionRecord> {
        let mut state = self.write()?;
        if state.tasks.contains_key(task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id().clone()));
        }
        state.ensure_dependencies_exist(task.id(), dependencies)?;

        state.tasks.insert(task.id().clone(), task.clone());
        let record = state.append(transition.clone());
        state.replace_dependencies(task.id(), dependencies);
        Ok(record)
    }

    async fn update(
        &self,
        id: &TaskId,
        change: &TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<AppliedChange> {
        let mut state = self.write()?;
        let Some(current) = state.tasks.get(id) else {
            return Err(TaskRepositoryError::NotFound(id.clone()));
        };
        let mut task = current.clone();
        if let Some(dependencies) = change.dependencies.as_set() {
            state.ensure_dependencies_exist(id, dependencies)?;
        }

        let transition = task
            .apply(change, at)
            .map(|pending| state.append(pending));
        state.tasks.insert(id.clone(), task.clone());
        if let Some(dependencies) = change.dependencies.as_set() {
            state.replace_dependencies(id, dependencies);
        }
        Ok(AppliedChange {
            details: state.details(&task),
            transition,
        })
    }

    async fn delete(&self, id: &TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.remove(id).is_none() {
            return Err(TaskRepositoryError::NotFound(id.clone()));
        }
        state.edges.retain(|edge| !edge.touches(id));
        state.transitions.retain(|record| &record.task_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> TaskRepositoryResult<Option<TaskDetails>> {
        let state = self.read()?;
        Ok(state.tasks.get(id).map(|task| state.details(task)))
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<TaskDetails>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .map(|task| state.details(task))
            .collect())
    }

    async fn add_dependency(&self, edge: &DependencyEdge) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&edge.task_id) {
            return Err(TaskRepositoryError::NotFound(edge.task_id.clone()));
        }
        if !state.tasks.contains_key(&edge.depends_on) {
            return Err(TaskRepositoryError::DependencyNotFound(
                edge.depends_on.clone(),
            ));
        }
        Ok(state.edges.insert(edge.clone()))
    }

    async fn remove_dependency(&self, edge: &DependencyEdge) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.edges.remove(edge) {
            Ok(())
        } else {
            Err(TaskRepositoryError::EdgeNotFound(edge.clone()))
        }
    }

    async fn column_counts(&self) -> TaskRepositoryResult<ColumnCounts> {
        let state = self.read()?;
        Ok(ColumnCounts::tally(state.tasks.values().map(Task::column)))
    }
}

#[async_trait]
impl TransitionLog for InMemoryTaskRepository {
    async fn transitions_for(&self, id: &TaskId) -> TaskRepositoryResult<Vec<TransitionRecord>> {
        let state = self.read()?;
        let mut records: Vec<_> = state
            .transitions
            .iter()
            .filter(|record| &record.task_id == id)
            .cloned()
            .collect();
        sort_chronologically(&mut records);
        Ok(records)
    }

    async fn all_transitions(&self) -> TaskRepositoryResult<Vec<TransitionRecord>> {
        let state = self.read()?;
        let mut records = state.transitions.clone();
        sort_chronologically(&mut records);
        Ok(records)
    }
}
