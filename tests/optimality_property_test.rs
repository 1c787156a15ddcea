// Property test: the optimizer matches an independent brute-force enumeration
use drop_route::{MatrixOracle, OptimizerConfig, RouteOptimizer};
use proptest::prelude::*;

/// All orderings of `items`, built recursively
fn generate_permutations(items: Vec<usize>) -> Vec<Vec<usize>> {
    if items.is_empty() {
        return vec![vec![]];
    }

    let mut result = Vec::new();
    for (i, &item) in items.iter().enumerate() {
        let mut remaining = items.clone();
        remaining.remove(i);

        for mut perm in generate_permutations(remaining) {
            perm.insert(0, item);
            result.push(perm);
        }
    }
    result
}

fn route_cost(costs: &[Vec<u32>], route: &[usize]) -> f64 {
    route
        .windows(2)
        .map(|leg| costs[leg[0]][leg[1]] as f64)
        .sum()
}

prop_compose! {
    /// Stop count and a full asymmetric cost matrix over start, stops and end
    fn problem()
        (stops in 0usize..=6)
        (costs in prop::collection::vec(prop::collection::vec(0u32..100, stops + 2), stops + 2),
         stops in Just(stops))
        -> (usize, Vec<Vec<u32>>) {
        (stops, costs)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn optimizer_finds_global_minimum((stops, costs) in problem(), workers in 1usize..5) {
        let n = stops + 2;
        let mut oracle = MatrixOracle::new();
        for (i, row) in costs.iter().enumerate() {
            for (j, &cost) in row.iter().enumerate() {
                oracle.insert(i, j, cost as f64);
            }
        }

        let config = OptimizerConfig { workers, ..OptimizerConfig::default() };
        let optimizer = RouteOptimizer::with_config(oracle, config).unwrap();
        let stop_ids: Vec<usize> = (1..=stops).collect();
        let result = optimizer.optimize(0, n - 1, &stop_ids).unwrap();

        let expected = generate_permutations(stop_ids.clone())
            .into_iter()
            .map(|order| {
                let mut route = vec![0];
                route.extend(order);
                route.push(n - 1);
                route_cost(&costs, &route)
            })
            .fold(f64::INFINITY, f64::min);

        prop_assert_eq!(result.total_distance, expected);
        prop_assert_eq!(route_cost(&costs, result.route.locations()), expected);
        prop_assert_eq!(*result.route.start(), 0);
        prop_assert_eq!(*result.route.end(), n - 1);

        let mut visited = result.route.stops().to_vec();
        visited.sort_unstable();
        prop_assert_eq!(visited, stop_ids);
    }
}
