pub mod models;
pub mod problem;
pub mod report;
pub mod sensitivity;

use models::transportation::sets_and_parameters::{Parameters, Sets};
use models::TransportationLp;
pub use problem::Problem;
pub use report::Report;

/// Formulates the transportation lp for `problem`, solves it, and interprets the
/// solved model into a [`Report`]. One shot; a failed solve yields a failure report
/// rather than an error.
pub fn solve(problem: &Problem) -> grb::Result<Report> {
    let sets = Sets::new(problem);
    let parameters = Parameters::new(problem);

    let (model, variables, constraints) = TransportationLp::solve(&sets, &parameters, problem)?;

    sensitivity::interpret(&model, &variables, &constraints, problem, &sets, &parameters)
}
