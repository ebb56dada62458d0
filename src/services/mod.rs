pub mod batches;
pub mod forecast;
pub mod grade;
pub mod leads;
pub mod ledger;
pub mod members;
pub mod squad;
