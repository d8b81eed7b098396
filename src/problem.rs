use std::collections::HashMap;

use derive_more::Display;
use log::debug;
use serde::Deserialize;

/// The type used for transported quantity (tons)
pub type Quantity = f64;
/// The type used for cost (euros)
pub type Cost = f64;

/// Index of a source in `Problem::sources`
pub type SourceIndex = usize;
/// Index of a customer in `Problem::customers`
pub type CustomerIndex = usize;

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawProblem")]
pub struct Problem {
    /// The sources that can produce goods. Ordered as in the input.
    sources: Vec<Source>,
    /// The customers that must have their demand covered. Ordered as in the input.
    customers: Vec<Customer>,
    /// The routes along which transportation is possible. A route exists exactly when
    /// the input defines a unit cost for the (source, customer) pair; the order of the
    /// cost entries is preserved.
    routes: Vec<Route>,
}

impl Problem {
    /// The sources of this problem. Ordered by index (continuous, starting at 0)
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The customers of this problem. Ordered by index (continuous, starting at 0)
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The valid routes of this problem, in input order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[derive(Debug, Clone)]
pub struct Source {
    /// The identifier used for this source in the input data
    id: String,
    /// The production capacity of this source
    production: Quantity,
}

impl Source {
    /// The identifier used for this source in the input data
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The production capacity of this source
    pub fn production(&self) -> Quantity {
        self.production
    }
}

#[derive(Debug, Clone)]
pub struct Customer {
    /// The identifier used for this customer in the input data
    id: String,
    /// The minimum quantity that must be delivered to this customer
    demand: Quantity,
}

impl Customer {
    /// The identifier used for this customer in the input data
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The minimum quantity that must be delivered to this customer
    pub fn demand(&self) -> Quantity {
        self.demand
    }
}

/// A (source, customer) pair with a defined unit transportation cost.
#[derive(Debug, Clone)]
pub struct Route {
    source: SourceIndex,
    customer: CustomerIndex,
    /// The cost of moving one ton along this route
    unit_cost: Cost,
    /// The quantity that must be moved along this route, if the input mandates one.
    /// Presence is tracked explicitly; it is not the same thing as a quantity of zero.
    fixed: Option<Quantity>,
}

impl Route {
    pub fn source(&self) -> SourceIndex {
        self.source
    }

    pub fn customer(&self) -> CustomerIndex {
        self.customer
    }

    pub fn unit_cost(&self) -> Cost {
        self.unit_cost
    }

    pub fn fixed(&self) -> Option<Quantity> {
        self.fixed
    }
}

#[derive(Debug, Display)]
pub enum ProblemConstructionError {
    /// The same source id occurs twice in the source list
    #[display(fmt = "duplicate source id {}", _0)]
    DuplicateSource(String),
    /// The same customer id occurs twice in the customer list
    #[display(fmt = "duplicate customer id {}", _0)]
    DuplicateCustomer(String),
    /// A source has no entry in the production map
    #[display(fmt = "no production defined for source {}", _0)]
    MissingProduction(String),
    /// A customer has no entry in the demand map
    #[display(fmt = "no demand defined for customer {}", _0)]
    MissingDemand(String),
    /// Production capacities must be non-negative
    #[display(fmt = "source {} has negative production {}", source, production)]
    NegativeProduction { source: String, production: Quantity },
    /// Demands must be non-negative
    #[display(fmt = "customer {} has negative demand {}", customer, demand)]
    NegativeDemand { customer: String, demand: Quantity },
    /// A cost entry references a source that is not in the source list
    #[display(fmt = "cost entry ({}, {}) references unknown source", _0, _1)]
    UnknownSource(String, String),
    /// A cost entry references a customer that is not in the customer list
    #[display(fmt = "cost entry ({}, {}) references unknown customer", _0, _1)]
    UnknownCustomer(String, String),
    /// The same (source, customer) pair has more than one cost entry
    #[display(fmt = "duplicate cost entry for route ({}, {})", _0, _1)]
    DuplicateRoute(String, String),
}

impl std::error::Error for ProblemConstructionError {}

/// An `{"route": [source, customer], "value": v}` entry of the input data.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub route: (String, String),
    pub value: f64,
}

/// The raw shape of a scenario data file. Turned into a [`Problem`] by validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProblem {
    sources: Vec<String>,
    customers: Vec<String>,
    source_production: HashMap<String, Quantity>,
    customer_demand: HashMap<String, Quantity>,
    /// Defines the valid route set
    transportation_costs: Vec<RouteEntry>,
    /// Mandatory quantities, keyed by routes from `transportation_costs`
    #[serde(default)]
    fixed_transportation: Vec<RouteEntry>,
}

impl TryFrom<RawProblem> for Problem {
    type Error = ProblemConstructionError;

    fn try_from(raw: RawProblem) -> Result<Problem, ProblemConstructionError> {
        Problem::new(
            raw.sources,
            raw.customers,
            raw.source_production,
            raw.customer_demand,
            raw.transportation_costs,
            raw.fixed_transportation,
        )
    }
}

impl Problem {
    pub fn new(
        sources: Vec<String>,
        customers: Vec<String>,
        production: HashMap<String, Quantity>,
        demand: HashMap<String, Quantity>,
        costs: Vec<RouteEntry>,
        fixed: Vec<RouteEntry>,
    ) -> Result<Problem, ProblemConstructionError> {
        use ProblemConstructionError::*;

        let mut source_index = HashMap::new();
        for (i, id) in sources.iter().enumerate() {
            if source_index.insert(id.clone(), i).is_some() {
                return Err(DuplicateSource(id.clone()));
            }
        }

        let mut customer_index = HashMap::new();
        for (i, id) in customers.iter().enumerate() {
            if customer_index.insert(id.clone(), i).is_some() {
                return Err(DuplicateCustomer(id.clone()));
            }
        }

        let sources = sources
            .into_iter()
            .map(|id| {
                let production = *production
                    .get(&id)
                    .ok_or_else(|| MissingProduction(id.clone()))?;
                if production < 0.0 {
                    return Err(NegativeProduction {
                        source: id,
                        production,
                    });
                }
                Ok(Source { id, production })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let customers = customers
            .into_iter()
            .map(|id| {
                let demand = *demand.get(&id).ok_or_else(|| MissingDemand(id.clone()))?;
                if demand < 0.0 {
                    return Err(NegativeDemand {
                        customer: id,
                        demand,
                    });
                }
                Ok(Customer { id, demand })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // The cost entries define the route set. Input order is kept, so that variable
        // and constraint creation downstream is reproducible.
        let mut seen = HashMap::new();
        let mut routes = Vec::with_capacity(costs.len());
        for entry in costs {
            let (s, c) = entry.route;
            let source = *source_index
                .get(&s)
                .ok_or_else(|| UnknownSource(s.clone(), c.clone()))?;
            let customer = *customer_index
                .get(&c)
                .ok_or_else(|| UnknownCustomer(s.clone(), c.clone()))?;
            if seen.insert((source, customer), routes.len()).is_some() {
                return Err(DuplicateRoute(s, c));
            }
            routes.push(Route {
                source,
                customer,
                unit_cost: entry.value,
                fixed: None,
            });
        }

        // Mandatory quantities attach to existing routes. An entry for a pair outside
        // the route set violates the input contract; it is dropped rather than guarded.
        for entry in fixed {
            let (s, c) = &entry.route;
            let key = source_index
                .get(s)
                .and_then(|&s| customer_index.get(c).map(|&c| (s, c)));
            match key.and_then(|key| seen.get(&key)) {
                Some(&route) => routes[route].fixed = Some(entry.value),
                None => debug!("dropping fixed quantity for unknown route ({}, {})", s, c),
            }
        }

        Ok(Problem {
            sources,
            customers,
            routes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(s: &str, c: &str, value: f64) -> RouteEntry {
        RouteEntry {
            route: (s.to_string(), c.to_string()),
            value,
        }
    }

    fn base_case() -> Problem {
        serde_json::from_str(include_str!("../data/base_case.json")).unwrap()
    }

    #[test]
    fn parses_a_scenario_file() {
        let problem = base_case();

        assert_eq!(problem.sources().len(), 2);
        assert_eq!(problem.customers().len(), 3);
        assert_eq!(problem.sources()[0].id(), "Arn");
        assert_eq!(problem.sources()[0].production(), 550.0);
        assert_eq!(problem.customers()[2].id(), "Lon");
        assert_eq!(problem.customers()[2].demand(), 300.0);
    }

    #[test]
    fn route_set_is_exactly_the_cost_entries() {
        let problem = base_case();

        let routes: Vec<_> = problem
            .routes()
            .iter()
            .map(|r| {
                (
                    problem.sources()[r.source()].id(),
                    problem.customers()[r.customer()].id(),
                    r.unit_cost(),
                )
            })
            .collect();

        assert_eq!(
            routes,
            vec![
                ("Arn", "Ams", 1.0),
                ("Arn", "Ber", 2.5),
                ("Arn", "Lon", 3.5),
                ("Gou", "Ams", 1.2),
                ("Gou", "Lon", 2.5),
            ]
        );
    }

    #[test]
    fn rejects_unknown_source_in_cost_entry() {
        let result = Problem::new(
            vec!["A".into()],
            vec!["X".into()],
            HashMap::from([("A".into(), 10.0)]),
            HashMap::from([("X".into(), 5.0)]),
            vec![entry("B", "X", 1.0)],
            vec![],
        );
        assert!(matches!(
            result,
            Err(ProblemConstructionError::UnknownSource(..))
        ));
    }

    #[test]
    fn rejects_negative_demand() {
        let result = Problem::new(
            vec!["A".into()],
            vec!["X".into()],
            HashMap::from([("A".into(), 10.0)]),
            HashMap::from([("X".into(), -5.0)]),
            vec![entry("A", "X", 1.0)],
            vec![],
        );
        assert!(matches!(
            result,
            Err(ProblemConstructionError::NegativeDemand { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_route() {
        let result = Problem::new(
            vec!["A".into()],
            vec!["X".into()],
            HashMap::from([("A".into(), 10.0)]),
            HashMap::from([("X".into(), 5.0)]),
            vec![entry("A", "X", 1.0), entry("A", "X", 2.0)],
            vec![],
        );
        assert!(matches!(
            result,
            Err(ProblemConstructionError::DuplicateRoute(..))
        ));
    }

    #[test]
    fn fixed_quantity_attaches_to_its_route() {
        let problem = Problem::new(
            vec!["A".into()],
            vec!["X".into(), "Y".into()],
            HashMap::from([("A".into(), 10.0)]),
            HashMap::from([("X".into(), 5.0), ("Y".into(), 2.0)]),
            vec![entry("A", "X", 1.0), entry("A", "Y", 2.0)],
            vec![entry("A", "Y", 3.0)],
        )
        .unwrap();

        assert_eq!(problem.routes()[0].fixed(), None);
        assert_eq!(problem.routes()[1].fixed(), Some(3.0));
    }

    #[test]
    fn fixed_quantity_outside_the_route_set_is_dropped() {
        let problem = Problem::new(
            vec!["A".into()],
            vec!["X".into(), "Y".into()],
            HashMap::from([("A".into(), 10.0)]),
            HashMap::from([("X".into(), 5.0), ("Y".into(), 2.0)]),
            vec![entry("A", "X", 1.0)],
            vec![entry("A", "Y", 3.0), entry("B", "X", 1.0)],
        )
        .unwrap();

        assert_eq!(problem.routes().len(), 1);
        assert_eq!(problem.routes()[0].fixed(), None);
    }

    #[test]
    fn fixed_quantity_of_zero_is_kept_distinct_from_absent() {
        let problem = Problem::new(
            vec!["A".into()],
            vec!["X".into(), "Y".into()],
            HashMap::from([("A".into(), 10.0)]),
            HashMap::from([("X".into(), 5.0), ("Y".into(), 2.0)]),
            vec![entry("A", "X", 1.0), entry("A", "Y", 2.0)],
            vec![entry("A", "Y", 0.0)],
        )
        .unwrap();

        assert_eq!(problem.routes()[0].fixed(), None);
        assert_eq!(problem.routes()[1].fixed(), Some(0.0));
    }
}
