//! Unit tests for wp-search.

#[cfg(test)]
mod helpers {
    use wp_core::{GeoPoint, NodeId};
    use wp_network::{cost_table, EdgeAttrs, RoadNetwork, RoadNetworkBuilder, RushWindows};

    use crate::PathCandidate;

    pub const SERIES: [u32; 3] = [0, 600, 1020];

    /// 0 → 1 → 2, both edges `{0: 5, 600: 5, 1020: 8}`.
    pub fn line() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(SERIES.to_vec());
        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.01, 0.0));
        let n2 = b.add_node(GeoPoint::new(0.02, 0.0));
        let peak = cost_table([(0, 5.0), (600, 5.0), (1020, 8.0)]);
        b.add_edge(n0, n1, EdgeAttrs::new(1.0, 10.0, 10.0), peak.clone());
        b.add_edge(n1, n2, EdgeAttrs::new(1.0, 10.0, 10.0), peak);
        b.build().unwrap()
    }

    /// Two routes from S(0) to T(3):
    ///
    /// ```text
    ///   A(1) ──► T(3)      S → A → T: wide (20 m), 10 + 10 min, right turn at A
    ///   ▲        ▲
    ///   S(0) ──► B(2)      S → B → T: narrow (5 m), 5 + 5 min, left turn at B
    /// ```
    pub fn diamond() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(SERIES.to_vec());
        b.set_rush_windows(RushWindows::none());
        let s = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.01, 0.0));
        let bb = b.add_node(GeoPoint::new(0.0, 0.01));
        let t = b.add_node(GeoPoint::new(0.01, 0.01));
        let flat = |c: f64| cost_table(SERIES.iter().map(|&m| (m, c)));
        let wide = EdgeAttrs::new(1.0, 20.0, 20.0);
        let narrow = EdgeAttrs::new(1.0, 5.0, 5.0);
        b.add_edge(s, a, wide, flat(10.0));
        b.add_edge(a, t, wide, flat(10.0));
        b.add_edge(s, bb, narrow, flat(5.0));
        b.add_edge(bb, t, narrow, flat(5.0));
        b.build().unwrap()
    }

    /// The wide loop S → X → M → Y → T passes through Y, which the quick
    /// start S → Y → X → M has already used:
    ///
    /// ```text
    ///   S ─► Y ─► X ═► M       S → Y → X → M reaches M first, as wide and
    ///   │    ║ ▲  ▲    ║       shorter than S → X → M, but cannot go on
    ///   │    ▼ ╚══╪════╝       to Y.
    ///   │    T    │
    ///   └─────────┘
    /// ```
    pub fn revisit() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(SERIES.to_vec());
        b.set_rush_windows(RushWindows::none());
        let s = b.add_node(GeoPoint::new(0.0, 0.0));
        let y = b.add_node(GeoPoint::new(0.0, 0.005));
        let x = b.add_node(GeoPoint::new(0.005, 0.005));
        let m = b.add_node(GeoPoint::new(0.01, 0.005));
        let t = b.add_node(GeoPoint::new(0.0, 0.01));
        let flat = |c: f64| cost_table(SERIES.iter().map(|&k| (k, c)));
        b.add_edge(s, y, EdgeAttrs::new(0.1, 50.0, 50.0), flat(1.0));
        b.add_edge(y, x, EdgeAttrs::new(0.1, 50.0, 50.0), flat(1.0));
        b.add_edge(s, x, EdgeAttrs::new(1.0, 10.0, 10.0), flat(5.0));
        b.add_edge(x, m, EdgeAttrs::new(5.0, 100.0, 100.0), flat(1.0));
        b.add_edge(m, y, EdgeAttrs::new(5.0, 100.0, 100.0), flat(1.0));
        b.add_edge(y, t, EdgeAttrs::new(1.0, 1.0, 1.0), flat(1.0));
        b.build().unwrap()
    }

    pub const S: NodeId = NodeId(0);
    pub const A: NodeId = NodeId(1);
    pub const B: NodeId = NodeId(2);
    pub const T: NodeId = NodeId(3);

    /// Synthetic candidate with the given objective values.
    pub fn candidate(wideness: f64, right: u32, sharp: u32, travel: f64) -> PathCandidate {
        PathCandidate {
            departure:   0.0,
            arrival:     travel,
            path:        vec![NodeId(0), NodeId(1)],
            edges:       Vec::new(),
            right_turns: right,
            sharp_turns: sharp,
            width_km:    wideness,
            length_km:   1.0,
            score:       0.0,
        }
    }
}

// ── Lower bounds ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod bounds {
    use wp_core::NodeId;
    use crate::LowerBounds;
    use super::helpers::{diamond, line, A, B, S, T};

    #[test]
    fn line_bounds_use_minimum_cost() {
        let net = line();
        let lb = LowerBounds::compute(&net, NodeId(0), NodeId(2));
        assert_eq!(lb.from_source, vec![0.0, 5.0, 10.0]);
        assert_eq!(lb.to_target, vec![10.0, 5.0, 0.0]);
        assert_eq!(lb.source_to_target(NodeId(2)), 10.0);
    }

    #[test]
    fn unreachable_is_infinite() {
        let net = line();
        let lb = LowerBounds::compute(&net, NodeId(2), NodeId(0));
        assert!(lb.from_source[0].is_infinite());
        assert!(lb.to_target[2].is_infinite());
    }

    #[test]
    fn diamond_takes_cheaper_branch() {
        let net = diamond();
        let lb = LowerBounds::compute(&net, S, T);
        assert_eq!(lb.source_to_target(T), 10.0);
        assert_eq!(lb.to_target[A.index()], 10.0);
        assert_eq!(lb.to_target[B.index()], 5.0);
    }
}

// ── Bidirectional frontiers ───────────────────────────────────────────────────

#[cfg(test)]
mod frontier {
    use wp_core::NodeId;
    use crate::frontier::explore;
    use crate::queue::Watchdog;
    use crate::LowerBounds;
    use super::helpers::line;

    #[test]
    fn corridor_holds_exact_keys() {
        let net = line();
        let (s, t) = (NodeId(0), NodeId(2));
        let lb = LowerBounds::compute(&net, s, t);
        let c = explore(&net, &lb, s, t, 0.0, 15.0, &mut Watchdog::new(None))
            .unwrap()
            .expect("feasible");
        assert_eq!(c.earliest, vec![0.0, 5.0, 10.0]);
        assert!((c.latest[2] - 15.0).abs() < 1e-9);
        assert!((c.latest[1] - 10.0).abs() < 1e-9);
        assert!((c.latest[0] - 5.0).abs() < 1e-9);
        assert!(c.is_feasible(s, 0.0));
        assert!(!c.is_feasible(s, 6.0));

        let path = c.fastest_path(&net, s, t).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(net.edge_to[path[1].index()], t);
    }

    #[test]
    fn backward_inverts_time_dependent_costs() {
        // Arriving by 1028 means leaving node 1 at 1020 (cost 8), and node 0
        // where arrival(d) = 1020: d + 5 + 3 (d − 600) / 420 = 1020.
        let net = line();
        let (s, t) = (NodeId(0), NodeId(2));
        let lb = LowerBounds::compute(&net, s, t);
        let c = explore(&net, &lb, s, t, 990.0, 1028.0, &mut Watchdog::new(None))
            .unwrap()
            .expect("feasible");
        assert!((c.latest[1] - 1020.0).abs() < 1e-9);
        let d0 = c.latest[0];
        assert!((net.arrival_time(net.edge(s, NodeId(1)).unwrap(), d0) - 1020.0).abs() < 1e-9);
    }

    #[test]
    fn no_meeting_when_budget_too_small() {
        let net = line();
        let (s, t) = (NodeId(0), NodeId(2));
        let lb = LowerBounds::compute(&net, s, t);
        let c = explore(&net, &lb, s, t, 0.0, 5.0, &mut Watchdog::new(None)).unwrap();
        assert!(c.is_none());
    }

    #[test]
    fn no_meeting_when_disconnected() {
        let net = line();
        let (s, t) = (NodeId(2), NodeId(0));
        let lb = LowerBounds::compute(&net, s, t);
        let c = explore(&net, &lb, s, t, 0.0, 1_000.0, &mut Watchdog::new(None)).unwrap();
        assert!(c.is_none());
    }
}

// ── Objective model ───────────────────────────────────────────────────────────

#[cfg(test)]
mod objective {
    use std::cmp::Ordering;

    use wp_core::{ObjectiveWeights, RoutingMode, TurnThresholds};
    use crate::{classify_turn, mean_width, PathCandidate, Scorer};
    use super::helpers::{candidate, diamond, A, B, S, T};

    #[test]
    fn classifies_right_and_left_turns() {
        let net = diamond();
        let th = TurnThresholds::default();
        // North then east.
        let t = classify_turn(&net, &th, S, A, T);
        assert!(t.right && t.sharp);
        // East then north.
        let t = classify_turn(&net, &th, S, B, T);
        assert!(!t.right && t.sharp);

        let lenient = TurnThresholds { right_turn_min_deg: 30.0, sharp_turn_deg: 120.0 };
        let t = classify_turn(&net, &lenient, S, A, T);
        assert!(t.right && !t.sharp);
    }

    #[test]
    fn mean_width_of_empty_path_is_zero() {
        assert_eq!(mean_width(0.0, 0.0), 0.0);
        assert_eq!(mean_width(30.0, 2.0), 15.0);
    }

    #[test]
    fn trivial_path_scores_identity_in_every_mode() {
        for mode in RoutingMode::ALL {
            let scorer = Scorer::new(mode, ObjectiveWeights::default());
            let c = PathCandidate::trivial(S, 480.0);
            let s = scorer.score(&c);
            assert_eq!(s.to_bits(), 0.0f64.to_bits(), "{mode}");
            assert_eq!(c.travel_time(), 0.0);
        }
    }

    #[test]
    fn scores_per_mode() {
        let w = ObjectiveWeights::default();
        let c = candidate(12.0, 2, 1, 30.0);
        assert_eq!(Scorer::new(RoutingMode::WidenessOnly, w).score(&c), 12.0);
        assert_eq!(Scorer::new(RoutingMode::MinTurnsOnly, w).score(&c), -2.0);
        assert_eq!(Scorer::new(RoutingMode::WidenessAndTurns, w).score(&c), 12.0);
        assert_eq!(
            Scorer::new(RoutingMode::AllObjectives, w).score(&c),
            12.0 - 0.5 * 2.0 - 1.5 * 1.0
        );
    }

    #[test]
    fn wideness_ties_break_on_travel_time() {
        let scorer = Scorer::new(RoutingMode::WidenessOnly, ObjectiveWeights::default());
        let picked = scorer.select(vec![candidate(10.0, 0, 0, 30.0), candidate(10.0, 3, 3, 20.0)]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].travel_time(), 20.0);
    }

    #[test]
    fn turn_ties_break_on_wideness() {
        let scorer = Scorer::new(RoutingMode::MinTurnsOnly, ObjectiveWeights::default());
        let picked = scorer.select(vec![
            candidate(5.0, 1, 0, 10.0),
            candidate(9.0, 1, 0, 40.0),
            candidate(20.0, 2, 0, 10.0),
        ]);
        assert_eq!(picked[0].wideness(), 9.0);
        assert_eq!(picked[0].score, -1.0);
    }

    #[test]
    fn dominance_is_strict() {
        let scorer = Scorer::new(RoutingMode::WidenessAndTurns, ObjectiveWeights::default());
        let a = candidate(10.0, 1, 0, 10.0);
        let b = candidate(8.0, 1, 5, 10.0);
        assert!(scorer.dominates(&a, &b));
        assert!(!scorer.dominates(&b, &a));
        // Sharp turns are not a Pareto objective; equal vectors do not dominate.
        let c = candidate(10.0, 1, 9, 99.0);
        assert!(!scorer.dominates(&a, &c));
        assert!(!scorer.dominates(&c, &a));
    }

    #[test]
    fn pareto_keeps_frontier_best_first() {
        let scorer = Scorer::new(RoutingMode::WidenessAndTurns, ObjectiveWeights::default());
        let kept = scorer.select(vec![
            candidate(5.0, 0, 0, 10.0),
            candidate(8.0, 2, 0, 10.0),
            candidate(8.0, 1, 0, 30.0),
            candidate(8.0, 1, 0, 20.0),
            candidate(3.0, 0, 0, 5.0),
            candidate(12.0, 4, 0, 10.0),
        ]);
        let summary: Vec<(f64, u32, f64)> =
            kept.iter().map(|c| (c.wideness(), c.right_turns, c.travel_time())).collect();
        assert_eq!(summary, vec![(12.0, 4, 10.0), (8.0, 1, 20.0), (5.0, 0, 10.0)]);
    }

    #[test]
    fn compare_is_total() {
        let scorer = Scorer::new(RoutingMode::AllObjectives, ObjectiveWeights::default());
        let mut a = candidate(10.0, 0, 0, 10.0);
        let mut b = a.clone();
        b.path = vec![S, B];
        a.score = scorer.score(&a);
        b.score = scorer.score(&b);
        assert_eq!(scorer.compare(&a, &b), Ordering::Less);
        assert_eq!(scorer.compare(&a, &a), Ordering::Equal);
    }
}

// ── Pareto properties ─────────────────────────────────────────────────────────

#[cfg(test)]
mod pareto {
    use proptest::prelude::*;
    use wp_core::{ObjectiveWeights, RoutingMode};
    use crate::Scorer;
    use super::helpers::candidate;

    proptest! {
        #[test]
        fn frontier_is_mutually_non_dominated(
            points in prop::collection::vec((0u8..20, 0u32..6, 1u8..50), 0..40)
        ) {
            let scorer = Scorer::new(RoutingMode::WidenessAndTurns, ObjectiveWeights::default());
            let input: Vec<_> = points
                .iter()
                .map(|&(w, r, t)| candidate(f64::from(w), r, 0, f64::from(t)))
                .collect();
            let kept = scorer.select(input.clone());

            for a in &kept {
                for b in &kept {
                    prop_assert!(!scorer.dominates(a, b));
                }
            }
            // Every input is dominated by, or ties with, something kept.
            for c in &input {
                let covered = kept.iter().any(|k| {
                    scorer.dominates(k, c)
                        || (k.wideness() == c.wideness() && k.right_turns == c.right_turns)
                });
                prop_assert!(covered);
            }
        }
    }
}

// ── Per-departure search ──────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use std::time::Instant;

    use wp_core::{NodeId, RouterConfig, RoutingMode};
    use crate::{DepartureSearch, SearchError};
    use super::helpers::{diamond, line, revisit, A, B, S, T};

    #[test]
    fn line_within_budget() {
        let net = line();
        let cfg = RouterConfig::default();
        let search =
            DepartureSearch::new(&net, &cfg, RoutingMode::AllObjectives, NodeId(0), NodeId(2)).unwrap();
        let found = search.run(0.0, 15.0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].travel_time(), 10.0);
        assert_eq!(found[0].path, vec![NodeId(0), NodeId(1), NodeId(2)]);

        assert!(search.run(0.0, 5.0).unwrap().is_empty());
        // Exactly the travel time: inclusive.
        assert_eq!(search.run(0.0, 10.0).unwrap().len(), 1);
    }

    #[test]
    fn line_in_evening_peak() {
        let net = line();
        let cfg = RouterConfig::default();
        let search =
            DepartureSearch::new(&net, &cfg, RoutingMode::AllObjectives, NodeId(0), NodeId(2)).unwrap();
        let found = search.run(1020.0, 60.0).unwrap();
        assert_eq!(found[0].travel_time(), 16.0);
        assert!(search.run(1020.0, 15.9).unwrap().is_empty());
    }

    #[test]
    fn earlier_label_does_not_block_a_wider_loop() {
        let net = revisit();
        let cfg = RouterConfig::default();
        let search =
            DepartureSearch::new(&net, &cfg, RoutingMode::WidenessOnly, NodeId(0), NodeId(4)).unwrap();
        let found = search.run(0.0, 100.0).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, vec![NodeId(0), NodeId(2), NodeId(3), NodeId(1), NodeId(4)]);
        assert!((found[0].wideness() - 1011.0 / 12.0).abs() < 1e-9);
        assert_eq!(found[0].travel_time(), 8.0);
    }

    #[test]
    fn unknown_nodes() {
        let net = line();
        let cfg = RouterConfig::default();
        let err = DepartureSearch::new(&net, &cfg, RoutingMode::WidenessOnly, NodeId(0), NodeId(9));
        assert!(matches!(err, Err(SearchError::UnknownNode(n)) if n == NodeId(9)));
    }

    #[test]
    fn source_is_target() {
        let net = line();
        let cfg = RouterConfig::default();
        for mode in RoutingMode::ALL {
            let search = DepartureSearch::new(&net, &cfg, mode, NodeId(1), NodeId(1)).unwrap();
            let found = search.run(480.0, 0.0).unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].travel_time(), 0.0);
            assert_eq!(found[0].score, 0.0);
            assert_eq!(found[0].path, vec![NodeId(1)]);
        }
    }

    #[test]
    fn wideness_prefers_wide_route_when_budget_allows() {
        let net = diamond();
        let cfg = RouterConfig::default();
        let search = DepartureSearch::new(&net, &cfg, RoutingMode::WidenessOnly, S, T).unwrap();

        let roomy = search.run(0.0, 30.0).unwrap();
        assert_eq!(roomy[0].path, vec![S, A, T]);
        assert_eq!(roomy[0].score, 20.0);

        let tight = search.run(0.0, 15.0).unwrap();
        assert_eq!(tight[0].path, vec![S, B, T]);
        assert_eq!(tight[0].travel_time(), 10.0);
    }

    #[test]
    fn min_turns_avoids_right_turn() {
        let net = diamond();
        let cfg = RouterConfig::default();
        let search = DepartureSearch::new(&net, &cfg, RoutingMode::MinTurnsOnly, S, T).unwrap();
        let found = search.run(0.0, 30.0).unwrap();
        assert_eq!(found[0].path, vec![S, B, T]);
        assert_eq!(found[0].right_turns, 0);
        assert_eq!(found[0].sharp_turns, 1);
    }

    #[test]
    fn all_objectives_weighs_width_against_turns() {
        let net = diamond();
        let cfg = RouterConfig::default();
        let search = DepartureSearch::new(&net, &cfg, RoutingMode::AllObjectives, S, T).unwrap();
        let found = search.run(0.0, 30.0).unwrap();
        assert_eq!(found[0].path, vec![S, A, T]);
        assert_eq!(found[0].score, 20.0 - 0.5 - 1.5);
    }

    #[test]
    fn pareto_returns_both_routes() {
        let net = diamond();
        let cfg = RouterConfig::default();
        let search = DepartureSearch::new(&net, &cfg, RoutingMode::WidenessAndTurns, S, T).unwrap();
        let found = search.run(0.0, 30.0).unwrap();
        let paths: Vec<_> = found.iter().map(|c| c.path.clone()).collect();
        assert_eq!(paths, vec![vec![S, A, T], vec![S, B, T]]);
    }

    #[test]
    fn single_label_buckets_still_find_a_path() {
        let net = diamond();
        let cfg = RouterConfig { max_labels_per_node: 1, ..RouterConfig::default() };
        let search = DepartureSearch::new(&net, &cfg, RoutingMode::WidenessAndTurns, S, T).unwrap();
        assert!(!search.run(0.0, 30.0).unwrap().is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let net = diamond();
        let cfg = RouterConfig::default();
        let search = DepartureSearch::new(&net, &cfg, RoutingMode::WidenessAndTurns, S, T).unwrap();
        let a = search.run(0.0, 30.0).unwrap();
        let b = search.run(0.0, 30.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn expired_deadline_times_out() {
        let net = diamond();
        let cfg = RouterConfig::default();
        let search = DepartureSearch::new(&net, &cfg, RoutingMode::AllObjectives, S, T)
            .unwrap()
            .with_abort_at(Some(Instant::now()));
        assert_eq!(search.run(0.0, 30.0), Err(SearchError::Timeout));
    }
}
