//! Per-departure search driver.

use std::time::Instant;

use tracing::debug;

use wp_core::{NodeId, RouterConfig, RoutingMode};
use wp_network::{RoadNetwork, TIME_EPS};

use crate::bounds::LowerBounds;
use crate::candidate::PathCandidate;
use crate::frontier::explore;
use crate::labels::LabelSearch;
use crate::objective::Scorer;
use crate::queue::Watchdog;
use crate::{SearchError, SearchResult};

/// Everything about a `(source, target)` pair that does not depend on the
/// departure time.  Built once per query; `run` is then called for every
/// evaluated departure, possibly from several threads.
pub struct DepartureSearch<'a> {
    network:  &'a RoadNetwork,
    config:   &'a RouterConfig,
    scorer:   Scorer,
    source:   NodeId,
    target:   NodeId,
    bounds:   LowerBounds,
    abort_at: Option<Instant>,
}

impl<'a> DepartureSearch<'a> {
    pub fn new(
        network: &'a RoadNetwork,
        config: &'a RouterConfig,
        mode: RoutingMode,
        source: NodeId,
        target: NodeId,
    ) -> SearchResult<Self> {
        for node in [source, target] {
            if !network.contains(node) {
                return Err(SearchError::UnknownNode(node));
            }
        }
        Ok(Self {
            network,
            config,
            scorer: Scorer::new(mode, config.objective),
            source,
            target,
            bounds: LowerBounds::compute(network, source, target),
            abort_at: None,
        })
    }

    /// Abort any `run` still in progress at `at` with [`SearchError::Timeout`].
    pub fn with_abort_at(mut self, at: Option<Instant>) -> Self {
        self.abort_at = at;
        self
    }

    #[inline]
    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    #[inline]
    pub fn bounds(&self) -> &LowerBounds {
        &self.bounds
    }

    /// Best candidate (scalar modes) or the non-dominated candidates (Pareto
    /// mode) for leaving at `departure` with at most `budget` minutes of
    /// travel.  Empty when no path fits.
    pub fn run(&self, departure: f64, budget: f64) -> SearchResult<Vec<PathCandidate>> {
        let mut watchdog = Watchdog::new(self.abort_at);
        watchdog.check_now()?;

        if self.source == self.target {
            return Ok(self.scorer.select(vec![PathCandidate::trivial(self.source, departure)]));
        }
        if self.bounds.source_to_target(self.target) > budget + TIME_EPS {
            debug!(departure, budget, "budget below static lower bound");
            return Ok(Vec::new());
        }

        let deadline = departure + budget;
        let Some(corridor) = explore(
            self.network,
            &self.bounds,
            self.source,
            self.target,
            departure,
            deadline,
            &mut watchdog,
        )?
        else {
            debug!(departure, budget, "frontiers exhausted without meeting");
            return Ok(Vec::new());
        };

        let labels = LabelSearch::new(
            self.network,
            &corridor,
            &self.config.turns,
            self.scorer.objectives(),
            self.config.max_labels_per_node,
        );
        let mut paths = labels.run(self.source, self.target, &mut watchdog)?;

        // The earliest-arrival path is always a candidate, whatever the
        // bucket caps dropped.
        if let Some(fastest) = corridor.fastest_path(self.network, self.source, self.target) {
            if !paths.contains(&fastest) {
                paths.push(fastest);
            }
        }

        let candidates: Vec<PathCandidate> = paths
            .into_iter()
            .map(|edges| {
                PathCandidate::replay(self.network, &self.config.turns, self.source, departure, edges)
            })
            .filter(|c| c.arrival <= deadline + TIME_EPS)
            .collect();

        let found = candidates.len();
        let selected = self.scorer.select(candidates);
        debug!(
            departure,
            meeting = %corridor.meeting,
            found,
            kept = selected.len(),
            "departure searched"
        );
        Ok(selected)
    }
}
