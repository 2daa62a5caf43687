use serde::{Deserialize, Serialize};

/// What causes a workflow to run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    /// Run on a schedule.
    Cron { schedule: String },
    /// Run when the referenced dataset gains a new version.
    DatasetChanged { reference: String },
}

/// One configured trigger on a workflow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub kind: TriggerKind,
    /// Inactive triggers stay configured but never fire.
    pub active: bool,
}

impl Trigger {
    pub fn cron(id: impl Into<String>, schedule: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TriggerKind::Cron {
                schedule: schedule.into(),
            },
            active: true,
        }
    }

    pub fn dataset_changed(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TriggerKind::DatasetChanged {
                reference: reference.into(),
            },
            active: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.active = false;
        self
    }
}
