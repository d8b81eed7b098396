use derive_more::Display;
use grb::prelude::*;
use grb::Status;
use log::{debug, trace};

use crate::models::transportation::model::{
    capacity_label, demand_label, fixed_label, route_label, Constraints, Variables,
};
use crate::models::transportation::sets_and_parameters::{Parameters, Sets};
use crate::problem::Problem;
use crate::report::{
    ConstraintSensitivity, Flow, Location, Report, Solution, VariableSensitivity,
};

/// Solver outcome, decoupled from the engine's own status type. Everything the engine
/// reports beyond the first four cases collapses into `Error`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    #[display(fmt = "Feasible, but not optimal")]
    Feasible,
    Infeasible,
    Unbounded,
    Error,
}

impl SolveStatus {
    /// Whether the solution is usable for interpretation. Feasible-but-not-optimal is
    /// a reportable outcome, just like optimal.
    pub fn is_success(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl From<Status> for SolveStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Optimal => SolveStatus::Optimal,
            Status::SubOptimal => SolveStatus::Feasible,
            Status::Infeasible => SolveStatus::Infeasible,
            Status::Unbounded | Status::InfOrUnbd => SolveStatus::Unbounded,
            _ => SolveStatus::Error,
        }
    }
}

/// How the objective reacts to one extra unit of something, judged on the value as it
/// is displayed: the marginal value is rounded to two decimals *before* the sign test,
/// so a -0.004 never reads as a decrease.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginalEffect {
    /// The objective would decrease by this much per unit
    Decrease(f64),
    /// The objective would increase by this much per unit
    Increase(f64),
    /// The objective would not move
    Neutral,
}

impl MarginalEffect {
    pub fn classify(value: f64) -> MarginalEffect {
        let rounded = round2(value);
        if rounded < 0.0 {
            MarginalEffect::Decrease(-rounded)
        } else if rounded > 0.0 {
            MarginalEffect::Increase(rounded)
        } else {
            MarginalEffect::Neutral
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Decodes the optimized model back into domain terms: positive flows, constraint
/// slack and shadow prices, variable values and reduced costs, and the marginal-effect
/// classification of binding constraints and zero-valued variables.
pub fn interpret(
    model: &Model,
    variables: &Variables,
    constraints: &Constraints,
    problem: &Problem,
    sets: &Sets,
    parameters: &Parameters,
) -> grb::Result<Report> {
    let status = SolveStatus::from(model.status()?);
    if !status.is_success() {
        debug!("no usable solution: {:?}", status);
        return Ok(Report::Failed { status });
    }

    trace!("interpreting solved model ({:?})", status);
    let total_cost = model.get_attr(attr::ObjVal)?;

    // routes that actually carry goods, in route order
    let mut flows = Vec::new();
    for e in &sets.E {
        let quantity = model.get_obj_attr(attr::X, &variables.x[*e])?;
        if quantity > 0.0 {
            let (s, c) = parameters.route[*e];
            flows.push(Flow {
                source: problem.sources()[*s].id().to_string(),
                customer: problem.customers()[*c].id().to_string(),
                quantity,
            });
        }
    }

    let mut constraint_records = Vec::new();
    for (s, constr) in constraints.capacity.iter_enumerated() {
        let source = problem.sources()[*s].id();
        let slack = model.get_obj_attr(attr::Slack, constr)?;
        let shadow_price = model.get_obj_attr(attr::Pi, constr)?;
        constraint_records.push(ConstraintSensitivity {
            name: capacity_label(source),
            location: Location::Source(source.to_string()),
            slack,
            shadow_price,
            effect: (slack == 0.0).then(|| MarginalEffect::classify(shadow_price)),
        });
    }
    for (c, constr) in constraints.demand.iter_enumerated() {
        let customer = problem.customers()[*c].id();
        // a demand constraint only bounds from below: its slack is reported as zero
        // rather than infinity, which makes every demand row eligible for narration
        let slack = 0.0;
        let shadow_price = model.get_obj_attr(attr::Pi, constr)?;
        constraint_records.push(ConstraintSensitivity {
            name: demand_label(customer),
            location: Location::Customer(customer.to_string()),
            slack,
            shadow_price,
            effect: Some(MarginalEffect::classify(shadow_price)),
        });
    }
    for (e, constr) in &constraints.fixed {
        let (s, c) = parameters.route[*e];
        let source = problem.sources()[*s].id();
        let customer = problem.customers()[*c].id();
        // pinned routes show up in the table but are never narrated
        constraint_records.push(ConstraintSensitivity {
            name: fixed_label(source, customer),
            location: Location::Route(source.to_string(), customer.to_string()),
            slack: model.get_obj_attr(attr::Slack, constr)?,
            shadow_price: model.get_obj_attr(attr::Pi, constr)?,
            effect: None,
        });
    }

    let mut variable_records = Vec::new();
    for e in &sets.E {
        let (s, c) = parameters.route[*e];
        let source = problem.sources()[*s].id();
        let customer = problem.customers()[*c].id();
        let value = model.get_obj_attr(attr::X, &variables.x[*e])?;
        let reduced_cost = model.get_obj_attr(attr::RC, &variables.x[*e])?;
        variable_records.push(VariableSensitivity {
            name: route_label(source, customer),
            source: source.to_string(),
            customer: customer.to_string(),
            value,
            reduced_cost,
            effect: (value == 0.0).then(|| MarginalEffect::classify(reduced_cost)),
        });
    }

    Ok(Report::Solved(Solution {
        status,
        total_cost,
        flows,
        constraints: constraint_records,
        variables: variable_records,
    }))
}
