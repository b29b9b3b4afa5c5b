//! Editing facade
//!
//! Wraps a storage backend and records every successful mutation in the
//! undo history. Batch execution records the whole batch as a single
//! `Multi` command so one undo reverses it all; a batch that fails
//! partway records nothing, since the already-applied steps were
//! confirmed individually and the user never saw the batch succeed.

use tracing::debug;

use staffrec_common::api::types::{Employee, EmployeeIn};

use crate::commands::{Command, CommandsHistory};
use crate::error::Result;
use crate::storage::StorageApi;

/// One step of a batch edit
#[derive(Debug, Clone)]
pub enum Action {
    Add(EmployeeIn),
    Update { before: Employee, data: EmployeeIn },
    Delete(Vec<i64>),
}

/// Storage front end with undo recording
pub struct Editor<S> {
    storage: S,
    history: CommandsHistory,
}

impl<S: StorageApi> Editor<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            history: CommandsHistory::default(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn history(&self) -> &CommandsHistory {
        &self.history
    }

    pub async fn add_employee(&mut self, employee: &EmployeeIn) -> Result<Employee> {
        let created = self.storage.add_employee(employee).await?;
        self.history.push(Command::AddEmployee {
            created_id: created.id,
        });
        Ok(created)
    }

    /// Update an employee; `before` is the pre-image used for undo
    pub async fn update_employee(
        &mut self,
        before: Employee,
        data: &EmployeeIn,
    ) -> Result<Employee> {
        let updated = self.storage.update_employee(before.id, data).await?;
        self.history.push(Command::UpdateEmployee { before });
        Ok(updated)
    }

    pub async fn delete_employees(&mut self, ids: &[i64]) -> Result<Vec<Employee>> {
        let deleted = self.storage.delete_employees(ids).await?;
        self.history.push(Command::DeleteEmployees {
            deleted: deleted.clone(),
        });
        Ok(deleted)
    }

    /// Apply a batch of actions, recorded as one undoable unit
    pub async fn execute_multi(&mut self, actions: Vec<Action>) -> Result<()> {
        let mut scoped = CommandsHistory::default();
        for action in actions {
            match action {
                Action::Add(input) => {
                    let created = self.storage.add_employee(&input).await?;
                    scoped.push(Command::AddEmployee {
                        created_id: created.id,
                    });
                }
                Action::Update { before, data } => {
                    self.storage.update_employee(before.id, &data).await?;
                    scoped.push(Command::UpdateEmployee { before });
                }
                Action::Delete(ids) => {
                    let deleted = self.storage.delete_employees(&ids).await?;
                    scoped.push(Command::DeleteEmployees { deleted });
                }
            }
        }
        debug!("recorded batch of {} commands", scoped.len());
        self.history.push(Command::Multi { history: scoped });
        Ok(())
    }

    /// Undo the most recent recorded command
    pub async fn undo_last(&mut self) -> Result<Vec<(i64, i64)>> {
        self.history.undo_last(&self.storage).await
    }

    /// Undo everything, most recent first
    pub async fn undo_all(&mut self) -> Result<Vec<(i64, i64)>> {
        self.history.undo_all(&self.storage).await
    }
}
