pub mod transportation;

pub use transportation::model::TransportationLp;
