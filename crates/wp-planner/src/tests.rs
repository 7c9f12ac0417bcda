//! Integration tests for wp-planner.

#[cfg(test)]
mod helpers {
    use wp_core::{GeoPoint, NodeId, RouterConfig, RoutingMode};
    use wp_network::{
        cost_table, EdgeAttrs, Properties, RoadNetwork, RoadNetworkBuilder, RushWindows,
        TimeCostTable,
    };

    use crate::Query;

    pub const SERIES: [u32; 3] = [0, 600, 1020];

    pub fn peak() -> TimeCostTable {
        cost_table([(0, 5.0), (600, 5.0), (1020, 8.0)])
    }

    /// 0 → 1 → 2 with the evening-peak profile on both edges.  Roads are
    /// 15 m wide, narrowed to 10 m during the default rush windows.
    pub fn scenario() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(SERIES.to_vec());
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.01, 0.0));
        let n2 = b.add_node(GeoPoint::new(0.02, 0.0));
        b.add_edge(n0, n1, EdgeAttrs::new(1.0, 15.0, 10.0), peak());
        b.add_edge(n1, n2, EdgeAttrs::new(1.0, 15.0, 10.0), peak());
        b.build().unwrap()
    }

    /// A single edge 0 → 1 with `table`.
    pub fn two_nodes(table: TimeCostTable) -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(SERIES.to_vec());
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.01, 0.0));
        b.add_edge(n0, n1, EdgeAttrs::new(1.0, 15.0, 10.0), table);
        b.build().unwrap()
    }

    /// S → A → T is wide (20 m) with a right turn at A; S → B → T is narrow
    /// (5 m) with a left turn at B and half the travel time.
    pub fn diamond() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(SERIES.to_vec());
        b.set_rush_windows(RushWindows::none());
        let s = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.01, 0.0));
        let bb = b.add_node(GeoPoint::new(0.0, 0.01));
        let t = b.add_node(GeoPoint::new(0.01, 0.01));
        let flat = |c: f64| cost_table(SERIES.iter().map(|&m| (m, c)));
        b.add_edge(s, a, EdgeAttrs::new(1.0, 20.0, 20.0), flat(10.0));
        b.add_edge(a, t, EdgeAttrs::new(1.0, 20.0, 20.0), flat(10.0));
        b.add_edge(s, bb, EdgeAttrs::new(1.0, 5.0, 5.0), flat(5.0));
        b.add_edge(bb, t, EdgeAttrs::new(1.0, 5.0, 5.0), flat(5.0));
        b.build().unwrap()
    }

    /// Two ways from S(0) to M(3), then one long road M → T(4):
    ///
    /// ```text
    ///   S ──► X ──► M ══► T      S → X → M reaches M one minute earlier
    ///   │     ▲                  than S → Y → X → M
    ///   └──► Y┘
    /// ```
    ///
    /// Every edge takes 1 minute.  The short edges are 1 km at 10 m; M → T
    /// is 10 km and 100 m wide, except that leaving M before `opens_at` it
    /// is 1 m wide.  `timed_width` chooses whether the narrowing comes from
    /// the default rush windows (`opens_at` = 600) or from per-sample
    /// widths on M → T alone.
    pub fn late_widening(timed_width: bool) -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(SERIES.to_vec());
        let s = b.add_node(GeoPoint::new(0.0, 0.0));
        let x = b.add_node(GeoPoint::new(0.01, 0.0));
        let y = b.add_node(GeoPoint::new(0.005, 0.005));
        let m = b.add_node(GeoPoint::new(0.02, 0.0));
        let t = b.add_node(GeoPoint::new(0.11, 0.0));
        let minute = || cost_table(SERIES.iter().map(|&k| (k, 1.0)));
        let short = EdgeAttrs::new(1.0, 10.0, 10.0);
        b.add_edge(s, x, short, minute());
        b.add_edge(x, m, short, minute());
        b.add_edge(s, y, short, minute());
        b.add_edge(y, x, short, minute());
        if timed_width {
            b.set_rush_windows(RushWindows::none());
            let table: TimeCostTable = [
                (0, Properties::with_width(1.0, 1.0)),
                (600, Properties::with_width(1.0, 100.0)),
                (1020, Properties::with_width(1.0, 100.0)),
            ]
            .into_iter()
            .collect();
            b.add_edge(m, t, EdgeAttrs::new(10.0, 1.0, 1.0), table);
        } else {
            b.add_edge(m, t, EdgeAttrs::new(10.0, 100.0, 1.0), minute());
        }
        b.build().unwrap()
    }

    pub const S: NodeId = NodeId(0);
    pub const A: NodeId = NodeId(1);
    pub const B: NodeId = NodeId(2);
    pub const T: NodeId = NodeId(3);

    pub fn query(from: u32, to: u32, dep: f64, interval: f64, budget: f64, mode: RoutingMode) -> Query {
        Query::new(NodeId(from), NodeId(to), dep, interval, budget, mode)
    }

    pub fn config() -> RouterConfig {
        RouterConfig::default()
    }
}

// ── Query ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod query {
    use wp_core::{RoutingMode, SampleSeries};

    use crate::QueryError;
    use super::helpers::{query, SERIES};

    fn series() -> SampleSeries {
        SampleSeries::new(SERIES.to_vec()).unwrap()
    }

    #[test]
    fn departures_cover_endpoints_and_interior_samples() {
        let q = query(0, 1, 500.0, 600.0, 10.0, RoutingMode::AllObjectives);
        assert_eq!(q.departures(&series()), vec![500.0, 600.0, 1020.0, 1100.0]);
    }

    #[test]
    fn zero_interval_is_a_single_departure() {
        let q = query(0, 1, 600.0, 0.0, 10.0, RoutingMode::AllObjectives);
        assert_eq!(q.departures(&series()), vec![600.0]);
    }

    #[test]
    fn endpoints_on_samples_are_not_repeated() {
        let q = query(0, 1, 600.0, 420.0, 10.0, RoutingMode::AllObjectives);
        assert_eq!(q.departures(&series()), vec![600.0, 1020.0]);
    }

    #[test]
    fn rejects_negative_or_non_finite_times() {
        for q in [
            query(0, 1, -1.0, 0.0, 10.0, RoutingMode::AllObjectives),
            query(0, 1, 0.0, f64::NAN, 10.0, RoutingMode::AllObjectives),
            query(0, 1, 0.0, 0.0, -5.0, RoutingMode::AllObjectives),
            query(0, 1, 0.0, 0.0, f64::INFINITY, RoutingMode::AllObjectives),
        ] {
            assert!(matches!(q.validate(), Err(QueryError::InvalidQuery(_))), "{q:?}");
        }
    }
}

// ── End-to-end planning ───────────────────────────────────────────────────────

#[cfg(test)]
mod plan {
    use std::time::Duration;

    use wp_core::{CoreError, NodeId, RouterConfig, RoutingMode};
    use wp_network::cost_table;

    use crate::{NoPathReason, Planner, QueryError, QueryOutcome};
    use super::helpers::{
        config, diamond, late_widening, peak, query, scenario, two_nodes, A, B, S, T,
    };

    #[test]
    fn generous_budget_finds_the_line() {
        let net = scenario();
        let planner = Planner::new(&net, config()).unwrap();
        let out = planner.plan(&query(0, 2, 0.0, 0.0, 15.0, RoutingMode::AllObjectives)).unwrap();

        let routes = out.routes();
        assert_eq!(routes.len(), 1);
        let r = &routes[0];
        assert_eq!(r.path(), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(r.departure(), 0.0);
        assert!((r.travel_time() - 10.0).abs() < 1e-9);
        assert_eq!(r.length_km(), 2.0);
        assert_eq!(r.right_turns(), 0);
        assert_eq!(r.budget(), 15.0);
    }

    #[test]
    fn tight_budget_has_no_path() {
        let net = scenario();
        let planner = Planner::new(&net, config()).unwrap();
        let out = planner.plan(&query(0, 2, 0.0, 0.0, 5.0, RoutingMode::AllObjectives)).unwrap();
        assert_eq!(out, QueryOutcome::NoFeasiblePath(NoPathReason::Exhausted));
        assert!(out.best().is_none());
    }

    #[test]
    fn wide_share_follows_rush_windows() {
        let net = scenario();
        let planner = Planner::new(&net, config()).unwrap();

        // 05:00: off-peak, both edges 15 m ≥ 12.8 m.
        let off = planner.plan(&query(0, 2, 300.0, 0.0, 15.0, RoutingMode::WidenessOnly)).unwrap();
        let r = off.best().unwrap();
        assert_eq!(r.wide_edge_indices(), &[0, 1]);
        assert!((r.wide_share_pct() - 100.0).abs() < 1e-9);
        assert_eq!(r.wideness(), 15.0);

        // 08:00: morning rush narrows both edges to 10 m.
        let rush = planner.plan(&query(0, 2, 480.0, 0.0, 15.0, RoutingMode::WidenessOnly)).unwrap();
        let r = rush.best().unwrap();
        assert!(r.wide_edge_indices().is_empty());
        assert_eq!(r.wide_share_pct(), 0.0);
        assert_eq!(r.wideness(), 10.0);
    }

    #[test]
    fn budget_below_window_minimum_is_infeasible() {
        let net = two_nodes(peak());
        let planner = Planner::new(&net, config()).unwrap();
        // Cheapest departure in [700, 900] costs 5 + 3·100/420 ≈ 5.71.
        let out = planner.plan(&query(0, 1, 700.0, 200.0, 5.5, RoutingMode::AllObjectives)).unwrap();
        assert_eq!(out, QueryOutcome::NoFeasiblePath(NoPathReason::Exhausted));
    }

    #[test]
    fn budget_above_maximum_reports_interpolated_cost() {
        let net = two_nodes(peak());
        let planner = Planner::new(&net, config()).unwrap();
        let out = planner.plan(&query(0, 1, 700.0, 200.0, 100.0, RoutingMode::AllObjectives)).unwrap();

        let r = out.best().unwrap();
        let e = net.find_edge(NodeId(0), NodeId(1)).unwrap();
        // Equal scores at 700 and 900; the faster departure wins.
        assert_eq!(r.departure(), 700.0);
        assert!((r.travel_time() - net.profile(e).cost_at(700.0)).abs() < 1e-9);
    }

    #[test]
    fn sweep_picks_the_feasible_departure() {
        let net = two_nodes(cost_table([(0, 20.0), (600, 5.0), (1020, 8.0)]));
        let planner = Planner::new(&net, config()).unwrap();
        let out = planner.plan(&query(0, 1, 0.0, 600.0, 10.0, RoutingMode::AllObjectives)).unwrap();

        let r = out.best().unwrap();
        assert_eq!(r.requested_departure(), 0.0);
        assert_eq!(r.departure(), 600.0);
        assert!((r.travel_time() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn source_equals_destination_is_trivial() {
        let net = scenario();
        let planner = Planner::new(&net, config()).unwrap();
        let out = planner.plan(&query(1, 1, 480.0, 0.0, 0.0, RoutingMode::AllObjectives)).unwrap();

        let r = out.best().unwrap();
        assert_eq!(r.path(), &[NodeId(1)]);
        assert_eq!(r.travel_time(), 0.0);
        assert_eq!(r.length_km(), 0.0);
        assert_eq!(r.wide_share_pct(), 0.0);
        assert_eq!(r.score(), 0.0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let net = scenario();
        let planner = Planner::new(&net, config()).unwrap();
        let err = planner.plan(&query(0, 9, 480.0, 0.0, 15.0, RoutingMode::AllObjectives)).unwrap_err();
        assert_eq!(err, QueryError::UnknownNode(NodeId(9)));
    }

    #[test]
    fn malformed_query_is_an_error() {
        let net = scenario();
        let planner = Planner::new(&net, config()).unwrap();
        let err = planner.plan(&query(0, 2, 480.0, 0.0, -1.0, RoutingMode::AllObjectives)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let net = scenario();
        let cfg = RouterConfig { max_labels_per_node: 0, ..config() };
        assert!(matches!(Planner::new(&net, cfg), Err(QueryError::Config(CoreError::Config(_)))));
    }

    #[test]
    fn expired_deadline_times_out() {
        let net = scenario();
        let cfg = RouterConfig { timeout: Some(Duration::ZERO), ..config() };
        let planner = Planner::new(&net, cfg).unwrap();
        let out = planner.plan(&query(0, 2, 480.0, 0.0, 15.0, RoutingMode::AllObjectives)).unwrap();
        assert_eq!(out, QueryOutcome::NoFeasiblePath(NoPathReason::TimedOut));
    }

    #[test]
    fn modes_choose_different_diamond_routes() {
        let net = diamond();
        let planner = Planner::new(&net, config()).unwrap();

        let wide = planner.plan(&query(0, 3, 0.0, 0.0, 30.0, RoutingMode::WidenessOnly)).unwrap();
        assert_eq!(wide.best().unwrap().path(), &[S, A, T]);

        let turns = planner.plan(&query(0, 3, 0.0, 0.0, 30.0, RoutingMode::MinTurnsOnly)).unwrap();
        assert_eq!(turns.best().unwrap().path(), &[S, B, T]);

        // The wide branch does not fit in 15 minutes.
        let tight = planner.plan(&query(0, 3, 0.0, 0.0, 15.0, RoutingMode::WidenessOnly)).unwrap();
        assert_eq!(tight.best().unwrap().path(), &[S, B, T]);
    }

    #[test]
    fn pareto_mode_returns_non_dominated_routes() {
        let net = diamond();
        let planner = Planner::new(&net, config()).unwrap();
        let out = planner.plan(&query(0, 3, 0.0, 0.0, 30.0, RoutingMode::WidenessAndTurns)).unwrap();

        let routes = out.routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path(), &[S, A, T]);
        assert_eq!(routes[1].path(), &[S, B, T]);
        for a in routes {
            for b in routes {
                let dominates = a.wideness() >= b.wideness()
                    && a.right_turns() <= b.right_turns()
                    && (a.wideness() > b.wideness() || a.right_turns() < b.right_turns());
                assert!(!dominates, "{a} dominates {b}");
            }
        }
    }

    #[test]
    fn later_arrival_can_catch_the_wide_road() {
        // Leaving at 09:57, the direct branch reaches M at 09:59, still in
        // the morning rush; the detour reaches it at 10:00 when M → T is wide.
        let net = late_widening(false);
        assert!(net.has_time_varying_widths());
        let planner = Planner::new(&net, config()).unwrap();
        let detour = [NodeId(0), NodeId(2), NodeId(1), NodeId(3), NodeId(4)];

        for mode in [RoutingMode::WidenessOnly, RoutingMode::AllObjectives, RoutingMode::WidenessAndTurns] {
            let out = planner.plan(&query(0, 4, 597.0, 0.0, 100.0, mode)).unwrap();
            let r = out.best().unwrap();
            assert_eq!(r.path(), &detour, "{mode}");
            assert!((r.wideness() - 1030.0 / 13.0).abs() < 1e-9, "{mode}");
            assert!((r.travel_time() - 4.0).abs() < 1e-9);
            assert_eq!(r.wide_edge_indices(), &[3]);
        }
    }

    #[test]
    fn per_sample_widths_steer_the_choice() {
        let net = late_widening(true);
        assert!(net.has_time_varying_widths());
        let planner = Planner::new(&net, config()).unwrap();

        let out = planner.plan(&query(0, 4, 597.0, 0.0, 100.0, RoutingMode::WidenessOnly)).unwrap();
        let r = out.best().unwrap();
        assert_eq!(r.path(), &[NodeId(0), NodeId(2), NodeId(1), NodeId(3), NodeId(4)]);
        assert!((r.wideness() - 1030.0 / 13.0).abs() < 1e-9);

        // Leaving at 10:00 both branches meet the wide road, and the direct
        // branch has the higher mean width.
        let out = planner.plan(&query(0, 4, 600.0, 0.0, 100.0, RoutingMode::WidenessOnly)).unwrap();
        let r = out.best().unwrap();
        assert_eq!(r.path(), &[NodeId(0), NodeId(1), NodeId(3), NodeId(4)]);
        assert!((r.wideness() - 1020.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_queries_agree() {
        let net = diamond();
        let planner = Planner::new(&net, config()).unwrap();
        let q = query(0, 3, 0.0, 600.0, 30.0, RoutingMode::WidenessAndTurns);

        let first = planner.plan(&q).unwrap();
        let second = planner.plan(&q).unwrap();
        assert_eq!(first.routes().len(), second.routes().len());
        for (a, b) in first.routes().iter().zip(second.routes()) {
            assert_eq!(a.path(), b.path());
            assert_eq!(a.departure(), b.departure());
            assert_eq!(a.score(), b.score());
        }
    }

    #[test]
    fn dedicated_pool_gives_the_same_answer() {
        let net = scenario();
        let shared = Planner::new(&net, config()).unwrap();
        let pooled = Planner::new(&net, RouterConfig { num_threads: Some(2), ..config() }).unwrap();
        let q = query(0, 2, 0.0, 1440.0, 20.0, RoutingMode::AllObjectives);

        let a = shared.plan(&q).unwrap();
        let b = pooled.plan(&q).unwrap();
        assert_eq!(a.best().unwrap().departure(), b.best().unwrap().departure());
        assert_eq!(a.best().unwrap().path(), b.best().unwrap().path());
    }
}
