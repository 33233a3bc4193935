//! Admin mapping editor
//!
//! Keeps the rule table the admin is looking at and mirrors each edit to
//! the backend. Edits show up locally first; if the backend rejects one,
//! the table goes back to what it was before the edit. Nothing is retried.

use tracing::{info, warn};

use crate::client::RuleClient;
use crate::error::{ClientError, RuleError};
use crate::models::{MappingRule, NewRule, RulePatch};
use crate::rules::RuleTable;

pub struct MappingEditor<C: RuleClient> {
    client: C,
    table: RuleTable,
}

impl<C: RuleClient> MappingEditor<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            table: RuleTable::new(),
        }
    }

    /// Replace local state with the backend's rule list
    pub async fn load(&mut self) -> Result<&[MappingRule], ClientError> {
        let rules = self.client.list_rules().await?;
        info!(count = rules.len(), "loaded mapping rules");
        self.table = RuleTable::from_rules(rules);
        Ok(self.table.list_rules())
    }

    pub fn list_rules(&self) -> &[MappingRule] {
        self.table.list_rules()
    }

    pub async fn create_rule(&mut self, new: NewRule) -> Result<MappingRule, ClientError> {
        if let Some(field) = new.missing_field() {
            return Err(RuleError::MissingField(field).into());
        }
        let snapshot = self.table.clone();
        let provisional = self.table.create_rule(new.clone());

        match self.client.create_rule(&new).await {
            Ok(saved) => {
                self.table.replace(provisional.id, saved.clone())?;
                Ok(saved)
            }
            Err(e) => Err(self.rollback(snapshot, "create", e)),
        }
    }

    pub async fn update_rule(&mut self, index: usize, patch: RulePatch) -> Result<MappingRule, ClientError> {
        let snapshot = self.table.clone();
        let local = self.table.update_rule(index, patch.clone())?;

        match self.client.update_rule(local.id, &patch).await {
            Ok(saved) => {
                self.table.replace(local.id, saved.clone())?;
                Ok(saved)
            }
            Err(e) => Err(self.rollback(snapshot, "update", e)),
        }
    }

    pub async fn delete_rule(&mut self, index: usize) -> Result<(), ClientError> {
        let id = self
            .table
            .list_rules()
            .get(index)
            .map(|r| r.id)
            .ok_or(RuleError::NotFound(index))?;
        let snapshot = self.table.clone();
        self.table.delete_rule(index)?;

        match self.client.delete_rule(id).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.rollback(snapshot, "delete", e)),
        }
    }

    fn rollback(&mut self, snapshot: RuleTable, op: &str, err: ClientError) -> ClientError {
        warn!("rule {} rejected by backend, rolling back: {}", op, err);
        self.table = snapshot;
        err
    }
}
