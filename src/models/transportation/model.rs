use derive_more::Constructor;
use grb::prelude::*;
use log::trace;
use typed_index_collections::TiVec;

use super::sets_and_parameters::{CustomerIndex, Parameters, RouteIndex, Sets, SourceIndex};
use crate::problem::Problem;

/// Stable names for the lp entities, used for solver logs and the report tables.
/// The semantic identity of a variable or constraint travels through the typed
/// collections in [`Variables`] and [`Constraints`]; nothing ever parses these back.
pub fn route_label(source: &str, customer: &str) -> String {
    format!("x_{}_{}", source, customer)
}

pub fn capacity_label(source: &str) -> String {
    format!("c01_capacity_{}", source)
}

pub fn demand_label(customer: &str) -> String {
    format!("c02_demand_{}", customer)
}

pub fn fixed_label(source: &str, customer: &str) -> String {
    format!("c03_fixed_{}_{}", source, customer)
}

#[derive(Constructor)]
pub struct Variables {
    /// Quantity transported along route e
    pub x: TiVec<RouteIndex, Var>,
}

/// Constraint handles, segregated by kind. Which collection a handle sits in, together
/// with its typed index, identifies the constraint for the interpreter.
#[derive(Constructor)]
pub struct Constraints {
    /// Production limit of source s
    pub capacity: TiVec<SourceIndex, Constr>,
    /// Demand lower bound of customer c
    pub demand: TiVec<CustomerIndex, Constr>,
    /// Mandatory-quantity equalities, one per route with a present non-zero fixed quantity
    pub fixed: Vec<(RouteIndex, Constr)>,
}

pub struct TransportationLp {}

impl TransportationLp {
    /// Builds the transportation lp
    pub fn build(
        sets: &Sets,
        parameters: &Parameters,
        problem: &Problem,
    ) -> grb::Result<(Model, Variables, Constraints)> {
        trace!("building transportation lp");

        let mut model = Model::new("transportation")?;
        // Disable console output
        model.set_param(param::OutputFlag, 0)?;
        // Primal simplex on a single thread, so that the reported basis (and with it
        // the duals and reduced costs) is reproducible between runs.
        model.set_param(param::Method, 0)?;
        model.set_param(param::Threads, 1)?;

        //*************CREATE VARIABLES*************//

        // quantity transported from source to customer along each route
        let x: TiVec<RouteIndex, Var> = sets
            .E
            .iter()
            .map(|e| {
                let (s, c) = parameters.route[*e];
                let name = route_label(
                    problem.sources()[*s].id(),
                    problem.customers()[*c].id(),
                );
                add_ctsvar!(model, name: &name, bounds: 0.0..)
            })
            .collect::<grb::Result<Vec<_>>>()?
            .into();

        // integrate all the variables into the model
        model.update()?;

        // ******************** ADD CONSTRAINTS ********************

        // production limit for each source; vacuous when the source has no routes
        let mut capacity: TiVec<SourceIndex, Constr> = TiVec::new();
        for s in &sets.S {
            let lhs = sets.E_s[*s].iter().map(|e| x[*e]).grb_sum();
            let name = capacity_label(problem.sources()[**s].id());
            capacity.push(model.add_constr(&name, c!(lhs <= parameters.P[*s]))?);
        }

        // demand lower bound for each customer
        let mut demand: TiVec<CustomerIndex, Constr> = TiVec::new();
        for c in &sets.C {
            let lhs = sets.E_c[*c].iter().map(|e| x[*e]).grb_sum();
            let name = demand_label(problem.customers()[**c].id());
            demand.push(model.add_constr(&name, c!(lhs >= parameters.D[*c]))?);
        }

        // pin routes with a mandatory quantity
        let mut fixed = Vec::new();
        for e in &sets.E {
            if let Some(quantity) = parameters.fixed_quantity(*e) {
                let (s, c) = parameters.route[*e];
                let name = fixed_label(
                    problem.sources()[*s].id(),
                    problem.customers()[*c].id(),
                );
                fixed.push((*e, model.add_constr(&name, c!(x[*e] == quantity))?));
            }
        }

        // SET OBJECTIVE

        let cost = sets.E.iter().map(|e| parameters.C[*e] * x[*e]).grb_sum();
        model.set_objective(cost, Minimize)?;

        model.update()?;

        trace!(
            "built transportation lp with {} variables and {} constraints",
            sets.E.len(),
            capacity.len() + demand.len() + fixed.len()
        );

        Ok((
            model,
            Variables::new(x),
            Constraints::new(capacity, demand, fixed),
        ))
    }

    /// Builds and optimizes the transportation lp. Status inspection and extraction of
    /// the solution is the interpreter's job.
    pub fn solve(
        sets: &Sets,
        parameters: &Parameters,
        problem: &Problem,
    ) -> grb::Result<(Model, Variables, Constraints)> {
        let (mut model, variables, constraints) = TransportationLp::build(sets, parameters, problem)?;

        model.optimize()?;

        Ok((model, variables, constraints))
    }
}
