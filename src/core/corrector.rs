use crate::core::compare::Check;
use crate::core::preferences::PreferenceNode;
use crate::domain::model::{Action, Adjuster, Adjustments, Drift, PrefValue, Report};
use crate::domain::ports::PrefsBackend;
use crate::utils::error::Result;
use std::collections::HashSet;

/// Lists the adjusters whose stored value drifts, in input order.
pub fn collect_drifts(
    node: &PreferenceNode,
    adjusters: &[Adjuster],
    skip_ids: &HashSet<&str>,
) -> Result<Vec<Drift>> {
    let mut drifts = Vec::new();

    for adjuster in adjusters {
        if skip_ids.contains(adjuster.id.as_str()) {
            continue;
        }
        let Some(check) = Check::prepare(adjuster)? else {
            continue;
        };

        let current = node.read(&check.id, &check.default);
        if check.drifts(&current) {
            tracing::debug!("'{}' drifts: {:?} -> {:?}", check.id, current, check.target);
            drifts.push(reported_drift(check.id, current, check.target));
        }
    }

    Ok(drifts)
}

/// Report entry for a drift. String entries list the target as `oldValue`
/// and the stored text as `newValue`; launchers read them in that order.
fn reported_drift(id: String, current: PrefValue, target: PrefValue) -> Drift {
    match (&current, &target) {
        (PrefValue::String(_), PrefValue::String(_)) => Drift {
            id,
            old_value: target,
            new_value: current,
        },
        _ => Drift {
            id,
            old_value: current,
            new_value: target,
        },
    }
}

/// Writes every drifting adjustment allowed by `filter` into `node`.
///
/// An empty filter allows everything. Returns what was written.
pub fn apply_fixes(
    node: &mut PreferenceNode,
    adjusters: &[Adjuster],
    filter: &[String],
) -> Result<Vec<Drift>> {
    let mut written = Vec::new();

    for adjuster in adjusters {
        if !filter.is_empty() && !filter.iter().any(|id| id == &adjuster.id) {
            tracing::debug!("'{}' not selected, leaving as is", adjuster.id);
            continue;
        }
        let Some(check) = Check::prepare(adjuster)? else {
            continue;
        };

        let current = node.read(&check.id, &check.default);
        if check.drifts(&current) {
            node.write(&check.id, &check.target);
            tracing::info!("🔧 {}: {:?} -> {:?}", check.id, current, check.target);
            written.push(Drift {
                id: check.id,
                old_value: current,
                new_value: check.target,
            });
        }
    }

    Ok(written)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixSummary {
    pub written: Vec<Drift>,
    pub flushed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Report(Report),
    Fixed(FixSummary),
}

pub struct Corrector<B: PrefsBackend> {
    backend: B,
    dry_run: bool,
}

impl<B: PrefsBackend> Corrector<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn load_node(&self) -> Result<PreferenceNode> {
        tracing::debug!("Loading preferences from {}", self.backend.location());
        let entries = self.backend.load().await?;
        tracing::debug!("Loaded {} preference entries", entries.len());
        Ok(PreferenceNode::new(entries))
    }

    /// Recommended entries already reported as breaking are not repeated.
    pub async fn check(&self, adjustments: &Adjustments) -> Result<Report> {
        let node = self.load_node().await?;

        let breaking = collect_drifts(&node, &adjustments.breaking, &HashSet::new())?;
        let reported: HashSet<&str> = breaking.iter().map(|d| d.id.as_str()).collect();
        let recommend = collect_drifts(&node, &adjustments.recommend, &reported)?;

        tracing::info!(
            "🔍 {} breaking and {} recommended preferences drift",
            breaking.len(),
            recommend.len()
        );
        Ok(Report {
            breaking,
            recommend,
        })
    }

    pub async fn fix(
        &self,
        adjustments: &Adjustments,
        include_recommended: bool,
        filter: &[String],
    ) -> Result<FixSummary> {
        let mut node = self.load_node().await?;

        let mut written = apply_fixes(&mut node, &adjustments.breaking, filter)?;
        if include_recommended {
            written.extend(apply_fixes(&mut node, &adjustments.recommend, filter)?);
        }

        let mut flushed = false;
        if !node.is_dirty() {
            tracing::info!("✅ Preferences already match, nothing to write");
        } else if self.dry_run {
            tracing::info!(
                "🔍 DRY RUN - {} preference(s) would be written to {}",
                written.len(),
                self.backend.location()
            );
        } else {
            self.backend.store(node.entries()).await?;
            flushed = true;
            tracing::info!(
                "💾 Wrote {} preference(s) to {}",
                written.len(),
                self.backend.location()
            );
        }

        Ok(FixSummary { written, flushed })
    }

    pub async fn run(
        &self,
        action: Action,
        adjustments: &Adjustments,
        filter: &[String],
    ) -> Result<Outcome> {
        tracing::info!("Running '{}'", action);
        match action {
            Action::Get => Ok(Outcome::Report(self.check(adjustments).await?)),
            Action::FixBreaking => Ok(Outcome::Fixed(self.fix(adjustments, false, filter).await?)),
            Action::FixAll => Ok(Outcome::Fixed(self.fix(adjustments, true, filter).await?)),
        }
    }
}
