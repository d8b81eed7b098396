use std::fmt;

use crate::sensitivity::{MarginalEffect, SolveStatus};

/// Everything the pipeline has to say about one scenario. Built by the interpreter,
/// rendered by `Display`; callers that want something other than text can walk the
/// records directly.
#[derive(Debug, Clone)]
pub enum Report {
    Solved(Solution),
    Failed { status: SolveStatus },
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolveStatus,
    /// Total transportation cost in euros
    pub total_cost: f64,
    /// Positive flows, in route order
    pub flows: Vec<Flow>,
    /// One record per constraint, in capacity / demand / fixed order
    pub constraints: Vec<ConstraintSensitivity>,
    /// One record per decision variable, in route order
    pub variables: Vec<VariableSensitivity>,
}

/// A route that carries goods in the solution.
#[derive(Debug, Clone)]
pub struct Flow {
    pub source: String,
    pub customer: String,
    pub quantity: f64,
}

/// What a constraint constrains, decoded from the model's structured records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Source(String),
    Customer(String),
    Route(String, String),
}

#[derive(Debug, Clone)]
pub struct ConstraintSensitivity {
    /// The constraint's name in the lp, e.g. `c01_capacity_Arn`
    pub name: String,
    pub location: Location,
    pub slack: f64,
    pub shadow_price: f64,
    /// The narrated effect; present exactly for binding capacity and demand constraints
    pub effect: Option<MarginalEffect>,
}

impl ConstraintSensitivity {
    /// The conclusion sentence for a narrated constraint. Capacity constraints speak of
    /// tons available in a source, demand constraints of tons supplied at a customer;
    /// pinned routes are never narrated.
    pub fn conclusion(&self) -> Option<String> {
        let effect = self.effect?;
        let place = match &self.location {
            Location::Source(id) => format!("for each additional ton available in {}", id),
            Location::Customer(id) => format!("for each additional ton supply at {}", id),
            Location::Route(..) => return None,
        };
        Some(narrate(effect, &place))
    }
}

#[derive(Debug, Clone)]
pub struct VariableSensitivity {
    /// The variable's name in the lp, e.g. `x_Arn_Ams`
    pub name: String,
    pub source: String,
    pub customer: String,
    pub value: f64,
    pub reduced_cost: f64,
    /// The narrated effect; present exactly for variables with zero value
    pub effect: Option<MarginalEffect>,
}

impl VariableSensitivity {
    /// The conclusion sentence for an idle route.
    pub fn conclusion(&self) -> Option<String> {
        let effect = self.effect?;
        let place = format!(
            "for each ton supply from {} to {}",
            self.source, self.customer
        );
        Some(narrate(effect, &place))
    }
}

fn narrate(effect: MarginalEffect, place: &str) -> String {
    match effect {
        MarginalEffect::Decrease(amount) => format!(
            "The total transportation cost would be reduced by {} euros {}",
            amount, place
        ),
        MarginalEffect::Increase(amount) => format!(
            "The total transportation cost would be increased in {} euros {}",
            amount, place
        ),
        MarginalEffect::Neutral => {
            format!("The total transportation cost would remain equal {}", place)
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Failed { .. } => writeln!(f, "The solver could not solve the problem."),
            Report::Solved(solution) => fmt::Display::fmt(solution, f),
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solver status: {}", self.status)?;
        writeln!(f)?;
        writeln!(f, "Total transportation cost: {}", self.total_cost)?;
        writeln!(f)?;

        writeln!(f, "Quantity exchanged between sources and customers:")?;
        writeln!(f, "{:<10} {:<10} {:>10}", "Source", "Customer", "Quantity")?;
        for flow in &self.flows {
            writeln!(
                f,
                "{:<10} {:<10} {:>10}",
                flow.source, flow.customer, flow.quantity
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Sensitivity analysis - constraints:")?;
        writeln!(
            f,
            "{:<24} {:>10} {:>14}",
            "Constraint", "Slack", "Shadow price"
        )?;
        for record in &self.constraints {
            writeln!(
                f,
                "{:<24} {:>10} {:>14}",
                record.name, record.slack, record.shadow_price
            )?;
        }
        writeln!(f)?;
        for conclusion in self.constraints.iter().filter_map(|r| r.conclusion()) {
            writeln!(f, "{}", conclusion)?;
        }
        writeln!(f)?;

        writeln!(f, "Sensitivity analysis - variables:")?;
        writeln!(f, "{:<16} {:>10} {:>14}", "Variable", "Value", "Reduced cost")?;
        for record in &self.variables {
            writeln!(
                f,
                "{:<16} {:>10} {:>14}",
                record.name, record.value, record.reduced_cost
            )?;
        }
        writeln!(f)?;
        for conclusion in self.variables.iter().filter_map(|r| r.conclusion()) {
            writeln!(f, "{}", conclusion)?;
        }

        Ok(())
    }
}
