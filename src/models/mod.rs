pub mod checklist;
pub mod form;
pub mod report;
pub mod witness;
