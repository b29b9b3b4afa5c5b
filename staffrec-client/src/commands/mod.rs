//! Reversible editing commands
//!
//! Every mutating operation the editor performs is recorded as a
//! `Command` holding exactly the state its reversal needs: the created
//! id for an add, the pre-image for an update, the full snapshots for a
//! delete. Reversing a delete recreates the records under fresh
//! server-assigned ids, so every reversal reports (old, new) id pairs
//! and earlier commands are rewritten to point at the new ids.

mod history;

pub use history::CommandsHistory;

use staffrec_common::api::types::Employee;

use crate::error::Result;
use crate::storage::StorageApi;

/// One recorded mutation, holding the state needed to reverse it
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// An employee was created; reversal deletes it
    AddEmployee { created_id: i64 },
    /// An employee was modified; reversal restores the pre-image
    UpdateEmployee { before: Employee },
    /// Employees were deleted; reversal recreates them from snapshots
    DeleteEmployees { deleted: Vec<Employee> },
    /// A batch executed as one undo unit
    Multi { history: CommandsHistory },
}

impl Command {
    /// Reverse this command against the backend.
    ///
    /// Id pairs produced by recreating deleted records are appended to
    /// `remaps` even when a later step fails, so the caller can still
    /// rewrite the commands that remain in its history.
    pub(crate) async fn reverse(
        self,
        storage: &dyn StorageApi,
        remaps: &mut Vec<(i64, i64)>,
    ) -> Result<()> {
        match self {
            Command::AddEmployee { created_id } => {
                storage.delete_employees(&[created_id]).await?;
                Ok(())
            }
            Command::UpdateEmployee { before } => {
                storage.update_employee(before.id, &before.to_input()).await?;
                Ok(())
            }
            Command::DeleteEmployees { deleted } => {
                for snapshot in deleted {
                    let recreated = storage.add_employee(&snapshot.to_input()).await?;
                    if recreated.id != snapshot.id {
                        remaps.push((snapshot.id, recreated.id));
                    }
                }
                Ok(())
            }
            // Boxed to break the reverse -> undo_all_into -> reverse cycle
            Command::Multi { mut history } => {
                Box::pin(history.undo_all_into(storage, remaps)).await
            }
        }
    }

    /// Rewrite every id this command targets according to `pairs`
    pub fn remap_ids(&mut self, pairs: &[(i64, i64)]) {
        match self {
            Command::AddEmployee { created_id } => remap(created_id, pairs),
            Command::UpdateEmployee { before } => remap(&mut before.id, pairs),
            Command::DeleteEmployees { deleted } => {
                for employee in deleted {
                    remap(&mut employee.id, pairs);
                }
            }
            Command::Multi { history } => history.remap_ids(pairs),
        }
    }
}

fn remap(id: &mut i64, pairs: &[(i64, i64)]) {
    if let Some((_, new_id)) = pairs.iter().find(|(old_id, _)| old_id == id) {
        *id = *new_id;
    }
}
