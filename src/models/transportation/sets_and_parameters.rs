use derive_more::{Deref, From, Into};
use typed_index_collections::TiVec;

use crate::problem::{Cost, Problem, Quantity};

#[derive(Deref, Debug, PartialEq, Eq, PartialOrd, From, Into, Clone, Copy, Hash)]
pub struct SourceIndex(usize);

#[derive(Deref, Debug, PartialEq, Eq, PartialOrd, From, Into, Clone, Copy, Hash)]
pub struct CustomerIndex(usize);

#[derive(Deref, Debug, PartialEq, Eq, PartialOrd, From, Into, Clone, Copy, Hash)]
pub struct RouteIndex(usize);

/// Sets for the transportation model
#[allow(non_snake_case)]
pub struct Sets {
    /// Set of sources
    pub S: Vec<SourceIndex>,
    /// Set of customers
    pub C: Vec<CustomerIndex>,
    /// Set of routes, ordered as the cost entries that define them
    pub E: Vec<RouteIndex>,
    /// Routes leaving source s
    pub E_s: TiVec<SourceIndex, Vec<RouteIndex>>,
    /// Routes arriving at customer c
    pub E_c: TiVec<CustomerIndex, Vec<RouteIndex>>,
}

impl Sets {
    pub fn new(problem: &Problem) -> Sets {
        let mut E_s: TiVec<SourceIndex, Vec<RouteIndex>> =
            vec![Vec::new(); problem.sources().len()].into();
        let mut E_c: TiVec<CustomerIndex, Vec<RouteIndex>> =
            vec![Vec::new(); problem.customers().len()].into();

        for (e, route) in problem.routes().iter().enumerate() {
            let e = RouteIndex(e);
            E_s[SourceIndex(route.source())].push(e);
            E_c[CustomerIndex(route.customer())].push(e);
        }

        Sets {
            S: (0..problem.sources().len()).map(SourceIndex).collect(),
            C: (0..problem.customers().len()).map(CustomerIndex).collect(),
            E: (0..problem.routes().len()).map(RouteIndex).collect(),
            E_s,
            E_c,
        }
    }
}

/// Parameters for the transportation model
#[allow(non_snake_case)]
pub struct Parameters {
    /// Production capacity of source s
    pub P: TiVec<SourceIndex, Quantity>,
    /// Demand of customer c
    pub D: TiVec<CustomerIndex, Quantity>,
    /// Unit transportation cost along route e
    pub C: TiVec<RouteIndex, Cost>,
    /// Mandatory quantity along route e, when the input defines one
    pub F: TiVec<RouteIndex, Option<Quantity>>,
    /// Endpoints (source, customer) of route e
    pub route: TiVec<RouteIndex, (SourceIndex, CustomerIndex)>,
}

impl Parameters {
    pub fn new(problem: &Problem) -> Parameters {
        Parameters {
            P: problem.sources().iter().map(|s| s.production()).collect(),
            D: problem.customers().iter().map(|c| c.demand()).collect(),
            C: problem.routes().iter().map(|r| r.unit_cost()).collect(),
            F: problem.routes().iter().map(|r| r.fixed()).collect(),
            route: problem
                .routes()
                .iter()
                .map(|r| (SourceIndex(r.source()), CustomerIndex(r.customer())))
                .collect(),
        }
    }

    /// The quantity route e is pinned to, if any.
    ///
    /// A present quantity of exactly zero counts as "not fixed" and yields no equality
    /// constraint. That also means a route cannot be pinned to zero flow; whether that
    /// is a feature or an oversight of the formulation is deliberately left open.
    pub fn fixed_quantity(&self, e: RouteIndex) -> Option<Quantity> {
        self.F[e].filter(|&q| q != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use itertools::iproduct;

    use super::*;

    fn problem() -> Problem {
        serde_json::from_str(include_str!("../../../data/base_case.json")).unwrap()
    }

    #[test]
    fn routes_are_a_sparse_subset_of_the_cross_product() {
        let problem = problem();
        let sets = Sets::new(&problem);
        let parameters = Parameters::new(&problem);

        let pairs: Vec<_> = sets.E.iter().map(|e| parameters.route[*e]).collect();
        let full: Vec<_> = iproduct!(&sets.S, &sets.C).map(|(s, c)| (*s, *c)).collect();
        assert!(pairs.iter().all(|p| full.contains(p)));
        assert!(pairs.len() < full.len());
        // Gou -> Ber has no cost entry and therefore no route
        assert!(!pairs.contains(&(SourceIndex(1), CustomerIndex(1))));
    }

    #[test]
    fn adjacency_partitions_the_route_set() {
        let problem = problem();
        let sets = Sets::new(&problem);

        // Arn -> {Ams, Ber, Lon}, Gou -> {Ams, Lon}
        assert_eq!(sets.E.len(), 5);
        assert_eq!(
            sets.E_s[SourceIndex(0)],
            vec![RouteIndex(0), RouteIndex(1), RouteIndex(2)]
        );
        assert_eq!(sets.E_s[SourceIndex(1)], vec![RouteIndex(3), RouteIndex(4)]);
        assert_eq!(sets.E_c[CustomerIndex(1)], vec![RouteIndex(1)]);
        assert_eq!(sets.E_c[CustomerIndex(2)], vec![RouteIndex(2), RouteIndex(4)]);

        let adjacency_total: usize = sets.S.iter().map(|s| sets.E_s[*s].len()).sum();
        assert_eq!(adjacency_total, sets.E.len());
    }

    #[test]
    fn route_table_recovers_the_endpoints() {
        let problem = problem();
        let sets = Sets::new(&problem);
        let parameters = Parameters::new(&problem);

        for e in &sets.E {
            let (s, c) = parameters.route[*e];
            let route = &problem.routes()[**e];
            assert_eq!(*s, route.source());
            assert_eq!(*c, route.customer());
        }
    }

    #[test]
    fn fixed_quantity_of_zero_yields_no_pin() {
        let problem: Problem =
            serde_json::from_str(include_str!("../../../data/fixed_route.json")).unwrap();
        let parameters = Parameters::new(&problem);

        let pinned: Vec<_> = (0..problem.routes().len())
            .map(RouteIndex)
            .filter_map(|e| parameters.fixed_quantity(e).map(|q| (e, q)))
            .collect();
        // the scenario pins Arn -> Lon to one ton; its zero-valued entry for
        // Gou -> Ams counts as "not fixed"
        assert_eq!(parameters.F[RouteIndex(3)], Some(0.0));
        assert_eq!(pinned, vec![(RouteIndex(2), 1.0)]);
    }
}
