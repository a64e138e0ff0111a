//! Equivalent resistance reduction.

use super::{CircuitType, Topology};
use crate::circuit::ComponentId;
use crate::components::Component;

/// Sum of resistances in series.
pub fn series_resistance(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Reciprocal of the summed conductances.
///
/// Returns `0.0` for an empty list or when the conductances sum to zero.
pub fn parallel_resistance(values: &[f64]) -> f64 {
    let conductance: f64 = values.iter().map(|v| 1.0 / v).sum();
    if conductance == 0.0 {
        0.0
    } else {
        1.0 / conductance
    }
}

/// Series sum per group, then the group sums in parallel.
///
/// A single group degenerates to its series sum.
pub fn mixed_resistance(groups: &[Vec<f64>]) -> f64 {
    let sums: Vec<f64> = groups.iter().map(|g| series_resistance(g)).collect();
    match sums.as_slice() {
        [] => 0.0,
        [single] => *single,
        _ => parallel_resistance(&sums),
    }
}

/// Equivalent resistance for a classified circuit.
///
/// `None` for types without a computed resistance.
pub fn equivalent_resistance(topology: &Topology, components: &[Component]) -> Option<f64> {
    let values = |group: &[ComponentId]| -> Vec<f64> {
        group
            .iter()
            .filter_map(|id| components.iter().find(|c| &c.id == id))
            .map(|c| c.value)
            .collect()
    };

    match topology.circuit_type {
        CircuitType::Series => {
            let all: Vec<f64> = topology.groups.iter().flat_map(|g| values(g)).collect();
            Some(series_resistance(&all))
        }
        CircuitType::Parallel => {
            let all: Vec<f64> = topology.groups.iter().flat_map(|g| values(g)).collect();
            Some(parallel_resistance(&all))
        }
        CircuitType::Mixed => {
            let groups: Vec<Vec<f64>> = topology.groups.iter().map(|g| values(g)).collect();
            Some(mixed_resistance(&groups))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Point;
    use approx::assert_relative_eq;

    #[test]
    fn test_series_sum() {
        assert_relative_eq!(series_resistance(&[100.0, 220.0, 330.0]), 650.0);
        assert_eq!(series_resistance(&[]), 0.0);
    }

    #[test]
    fn test_parallel_of_equal_values() {
        assert_relative_eq!(parallel_resistance(&[100.0, 100.0]), 50.0, epsilon = 1e-9);
        assert_relative_eq!(parallel_resistance(&[300.0, 300.0, 300.0]), 100.0, epsilon = 1e-9);
        assert_eq!(parallel_resistance(&[]), 0.0);
    }

    #[test]
    fn test_parallel_below_smallest_series_above_largest() {
        let values = [47.0, 100.0, 2200.0];
        let smallest = 47.0;
        let largest = 2200.0;
        assert!(parallel_resistance(&values) < smallest);
        assert!(series_resistance(&values) > largest);
    }

    #[test]
    fn test_adding_a_branch_lowers_parallel() {
        let two = parallel_resistance(&[100.0, 220.0]);
        let three = parallel_resistance(&[100.0, 220.0, 1000.0]);
        assert!(three < two);
    }

    #[test]
    fn test_mixed_groups() {
        // (100 + 100) || (50 + 150) = 100
        let groups = vec![vec![100.0, 100.0], vec![50.0, 150.0]];
        assert_relative_eq!(mixed_resistance(&groups), 100.0, epsilon = 1e-9);
        assert_relative_eq!(mixed_resistance(&[vec![10.0, 20.0]]), 30.0);
        assert_eq!(mixed_resistance(&[]), 0.0);
    }

    #[test]
    fn test_equivalent_resistance_by_id() {
        let components = vec![
            Component::resistor("R1", 100.0, Point::default()),
            Component::resistor("R2", 300.0, Point::default()),
        ];
        let ids = |names: &[&str]| -> Vec<ComponentId> {
            names.iter().map(|n| ComponentId::new(*n)).collect()
        };

        let series = Topology::new(CircuitType::Series, vec![ids(&["R2", "R1"])]);
        assert_eq!(equivalent_resistance(&series, &components), Some(400.0));

        let parallel = Topology::new(CircuitType::Parallel, vec![ids(&["R1"]), ids(&["R2"])]);
        assert_relative_eq!(
            equivalent_resistance(&parallel, &components).unwrap(),
            75.0,
            epsilon = 1e-9
        );

        let complex = Topology::unsolved(CircuitType::Complex);
        assert_eq!(equivalent_resistance(&complex, &components), None);
    }
}
