//! Three-way result for steps whose failures may be survivable.
//!
//! `Ok` carries data, `Degraded` means "could not produce data, but the run
//! may continue with an empty/fresh substitute", `Fatal` must abort the run.
//! Whether `Degraded` is acceptable is a per-deployment decision, expressed
//! by [`DegradePolicy`].

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum Outcome<T> {
    Ok(T),
    Degraded { reason: String },
    Fatal(anyhow::Error),
}

impl<T> Outcome<T> {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Outcome::Degraded {
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    /// Collapse into a plain `Result`, substituting `fallback` for `Degraded`
    /// when the policy allows it.
    pub fn resolve(
        self,
        policy: DegradePolicy,
        step: &str,
        fallback: impl FnOnce() -> T,
    ) -> anyhow::Result<T> {
        match self {
            Outcome::Ok(v) => Ok(v),
            Outcome::Degraded { reason } => match policy {
                DegradePolicy::Degrade => {
                    tracing::warn!(step, %reason, "degraded; continuing with fallback");
                    Ok(fallback())
                }
                DegradePolicy::Abort => {
                    anyhow::bail!("{step} failed and policy is abort: {reason}")
                }
            },
            Outcome::Fatal(e) => Err(e.context(format!("{step} failed"))),
        }
    }
}

/// What to do when a step reports [`Outcome::Degraded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradePolicy {
    #[default]
    Degrade,
    Abort,
}
