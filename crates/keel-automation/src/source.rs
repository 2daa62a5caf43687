use keel_types::ProfileId;

use crate::trigger::Trigger;

/// A source of runnable work for the orchestration layer.
///
/// The orchestrator never inspects workflow internals; it asks a source
/// which triggers are live and under whose authority they execute.
pub trait Source: Send + Sync {
    /// Stable identifier of the workflow behind this source.
    fn workflow_id(&self) -> &str;

    /// Triggers currently eligible to fire. Inactive triggers are omitted.
    fn active_triggers(&self) -> Vec<Trigger>;

    /// Identity whose authority the workflow runs under.
    fn scope_id(&self) -> ProfileId;
}

/// A stored workflow: a dataset kept up to date by automated runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workflow {
    pub id: String,
    /// Identity that owns the workflow and its output dataset.
    pub owner: ProfileId,
    /// Reference to the dataset the workflow maintains.
    pub dataset: String,
    pub triggers: Vec<Trigger>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, owner: ProfileId, dataset: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner,
            dataset: dataset.into(),
            triggers: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }
}

impl Source for Workflow {
    fn workflow_id(&self) -> &str {
        &self.id
    }

    fn active_triggers(&self) -> Vec<Trigger> {
        self.triggers.iter().filter(|t| t.active).cloned().collect()
    }

    fn scope_id(&self) -> ProfileId {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerKind;

    #[test]
    fn active_triggers_omit_disabled_ones() {
        let workflow = Workflow::new("wf-1", ProfileId::from_raw([1; 32]), "b5/population")
            .with_trigger(Trigger::cron("t-1", "0 0 * * *"))
            .with_trigger(Trigger::dataset_changed("t-2", "b5/upstream").disabled());

        let active = workflow.active_triggers();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "t-1");
    }

    #[test]
    fn source_exposes_workflow_identity_and_scope() {
        let owner = ProfileId::from_raw([2; 32]);
        let workflow = Workflow::new("wf-2", owner, "b5/population");
        let source: &dyn Source = &workflow;

        assert_eq!(source.workflow_id(), "wf-2");
        assert_eq!(source.scope_id(), owner);
        assert!(source.active_triggers().is_empty());
    }

    #[test]
    fn trigger_serde_roundtrip() {
        let trigger = Trigger::dataset_changed("t-9", "b5/upstream");
        let json = serde_json::to_string(&trigger).unwrap();
        let parsed: Trigger = serde_json::from_str(&json).unwrap();
        assert_eq!(trigger, parsed);
        assert!(matches!(parsed.kind, TriggerKind::DatasetChanged { .. }));
    }
}
