//! The query orchestrator.

use std::time::Instant;

use tracing::{info, warn};

use wp_core::RouterConfig;
use wp_network::RoadNetwork;
use wp_search::{DepartureSearch, PathCandidate, SearchError, SearchResult};

use crate::{NoPathReason, PlanResult, Query, QueryError, QueryOutcome, RouteResult};

/// Answers [`Query`]s against one immutable network.
///
/// A query is answered in four steps:
///
/// 1. **Validate** the query and resolve both endpoints.
/// 2. **Enumerate** departures: the window's endpoints plus every series
///    sample inside it.
/// 3. **Search** each departure independently (on Rayon's pool with the
///    `parallel` feature).  All searches share one deadline derived from
///    [`RouterConfig::timeout`].
/// 4. **Merge** per-departure answers in departure order and rank them with
///    the mode's scorer.
///
/// The planner holds no per-query state, so one instance may serve queries
/// from several threads.
pub struct Planner<'n> {
    network: &'n RoadNetwork,
    config:  RouterConfig,
    #[cfg(feature = "parallel")]
    pool:    Option<rayon::ThreadPool>,
}

impl<'n> Planner<'n> {
    /// Validate `config` and, when it asks for a thread count, build a
    /// dedicated worker pool.
    pub fn new(network: &'n RoadNetwork, config: RouterConfig) -> PlanResult<Self> {
        config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| QueryError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            network,
            config,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    #[inline]
    pub fn network(&self) -> &'n RoadNetwork {
        self.network
    }

    #[inline]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Answer `query`.
    ///
    /// Returns `Err` only for malformed queries.  Unreachable destinations
    /// and timeouts are reported as [`QueryOutcome::NoFeasiblePath`].
    pub fn plan(&self, query: &Query) -> PlanResult<QueryOutcome> {
        let started = Instant::now();
        query.validate()?;
        for node in [query.source, query.destination] {
            if !self.network.contains(node) {
                return Err(QueryError::UnknownNode(node));
            }
        }

        let abort_at = self.config.timeout.map(|limit| started + limit);
        let search = DepartureSearch::new(
            self.network,
            &self.config,
            query.mode,
            query.source,
            query.destination,
        )
        .map_err(search_error)?
        .with_abort_at(abort_at);

        let departures = query.departures(self.network.series());
        let per_departure = self.sweep(&search, &departures, query.budget);

        let mut candidates: Vec<PathCandidate> = Vec::new();
        for answer in per_departure {
            match answer {
                Ok(found) => candidates.extend(found),
                Err(SearchError::Timeout) => {
                    warn!(
                        source = %query.source,
                        destination = %query.destination,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "query timed out"
                    );
                    return Ok(QueryOutcome::NoFeasiblePath(NoPathReason::TimedOut));
                }
                Err(e) => return Err(search_error(e)),
            }
        }

        let ranked = search.scorer().select(candidates);
        let latency = started.elapsed();
        if ranked.is_empty() {
            info!(
                source = %query.source,
                destination = %query.destination,
                departures = departures.len(),
                latency_ms = latency.as_millis() as u64,
                "no feasible path"
            );
            return Ok(QueryOutcome::NoFeasiblePath(NoPathReason::Exhausted));
        }

        let routes = ranked
            .iter()
            .map(|c| {
                RouteResult::new(query, c, self.network, self.config.wide_road_threshold_m, latency)
            })
            .collect::<PlanResult<Vec<_>>>()?;

        info!(
            source = %query.source,
            destination = %query.destination,
            mode = query.mode.as_str(),
            departures = departures.len(),
            routes = routes.len(),
            travel_min = routes[0].travel_time(),
            latency_ms = latency.as_millis() as u64,
            "query answered"
        );
        Ok(QueryOutcome::Routes(routes))
    }

    /// Search every departure.  Answers are returned in `departures` order
    /// whether or not the searches ran in parallel.
    fn sweep(
        &self,
        search: &DepartureSearch<'_>,
        departures: &[f64],
        budget: f64,
    ) -> Vec<SearchResult<Vec<PathCandidate>>> {
        #[cfg(not(feature = "parallel"))]
        {
            departures.iter().map(|&dep| search.run(dep, budget)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || -> Vec<SearchResult<Vec<PathCandidate>>> {
                departures.par_iter().map(|&dep| search.run(dep, budget)).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}

fn search_error(e: SearchError) -> QueryError {
    match e {
        SearchError::UnknownNode(n) => QueryError::UnknownNode(n),
        SearchError::Timeout => QueryError::Internal("timeout outside the departure sweep".into()),
    }
}
