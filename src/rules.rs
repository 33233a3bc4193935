//! DMA/RSN mapping rule table
//!
//! Ordered, in-memory. Rows can be addressed by position (what the admin
//! table shows) or by their stable [`RuleId`].

use anyhow::Context;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::error::RuleError;
use crate::models::{MappingRule, NewRule, RuleCsvRecord, RuleId, RulePatch};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<MappingRule>,
}

/// Outcome of an upsert on the natural key
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
    pub rule: MappingRule,
    pub inserted: bool,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<MappingRule>) -> Self {
        Self { rules }
    }

    pub fn from_new_rules(rules: impl IntoIterator<Item = NewRule>) -> Self {
        Self {
            rules: rules.into_iter().map(NewRule::into_rule).collect(),
        }
    }

    pub fn load_json(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {:?}", path))
    }

    pub fn save_json(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn list_rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: RuleId) -> Option<&MappingRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn position(&self, id: RuleId) -> Option<usize> {
        self.rules.iter().position(|r| r.id == id)
    }

    pub fn create_rule(&mut self, new: NewRule) -> MappingRule {
        let rule = new.into_rule();
        self.rules.push(rule.clone());
        rule
    }

    /// Place an already-identified rule, replacing any row with the same id
    pub fn put_rule(&mut self, rule: MappingRule) {
        match self.position(rule.id) {
            Some(i) => self.rules[i] = rule,
            None => self.rules.push(rule),
        }
    }

    /// Swap the row holding `id` for `rule`, keeping its position. If `rule`
    /// already has its own row elsewhere, that row wins and `id` is dropped.
    pub fn replace(&mut self, id: RuleId, rule: MappingRule) -> Result<(), RuleError> {
        let index = self.position(id).ok_or(RuleError::UnknownId(id))?;
        if rule.id != id && self.position(rule.id).is_some() {
            self.rules.remove(index);
            self.put_rule(rule);
        } else {
            self.rules[index] = rule;
        }
        Ok(())
    }

    /// Patch the rule at `index`. A patch that blanks a field or moves the
    /// rule onto another rule's (region, team, sport) key leaves the table
    /// unchanged.
    pub fn update_rule(&mut self, index: usize, patch: RulePatch) -> Result<MappingRule, RuleError> {
        let mut patched = self.rules.get(index).ok_or(RuleError::NotFound(index))?.clone();
        patched.apply(patch);

        if let Some(field) = patched.missing_field() {
            return Err(RuleError::MissingField(field));
        }
        if let Some(other) = self
            .rules
            .iter()
            .find(|r| r.id != patched.id && r.key() == patched.key())
        {
            return Err(RuleError::Conflict {
                region: other.region.clone(),
                team: other.team.clone(),
                sport: other.sport.clone(),
            });
        }

        self.rules[index] = patched.clone();
        Ok(patched)
    }

    pub fn update_by_id(&mut self, id: RuleId, patch: RulePatch) -> Result<MappingRule, RuleError> {
        let index = self.position(id).ok_or(RuleError::UnknownId(id))?;
        self.update_rule(index, patch)
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<(), RuleError> {
        if index >= self.rules.len() {
            return Err(RuleError::NotFound(index));
        }
        self.rules.remove(index);
        Ok(())
    }

    pub fn delete_by_id(&mut self, id: RuleId) -> Result<MappingRule, RuleError> {
        let index = self.position(id).ok_or(RuleError::UnknownId(id))?;
        Ok(self.rules.remove(index))
    }

    /// Insert or update by normalized (region, team, sport)
    pub fn upsert_rule(&mut self, new: NewRule) -> Result<Upserted, RuleError> {
        if let Some(field) = new.missing_field() {
            return Err(RuleError::MissingField(field));
        }
        let new = new.normalized();
        let existing = self
            .rules
            .iter()
            .position(|r| r.key() == (new.region.as_str(), new.team.as_str(), new.sport.as_str()));

        match existing {
            Some(index) => {
                let rule = self.update_rule(index, RulePatch::channel(&new.channel))?;
                Ok(Upserted { rule, inserted: false })
            }
            None => Ok(Upserted {
                rule: self.create_rule(new),
                inserted: true,
            }),
        }
    }
}

/// Parse `dma,team,sport,channel` rows. Bad rows are logged and skipped;
/// returns the parsed rules and the number skipped.
pub fn read_rule_csv<R: Read>(reader: R) -> (Vec<NewRule>, usize) {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rules = Vec::new();
    let mut skipped = 0;
    for (line, record) in reader.deserialize::<RuleCsvRecord>().enumerate() {
        match record.map_err(anyhow::Error::from).and_then(|r| r.to_new_rule()) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                warn!("skipping row {}: {}", line + 2, e);
                skipped += 1;
            }
        }
    }
    (rules, skipped)
}
