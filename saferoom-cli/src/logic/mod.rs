pub mod interactive;
pub mod reports;
pub mod simulation;

pub use interactive::run_session;
pub use reports::{AnalysisReport, ReportFormat, write_analysis, write_simulations};
pub use simulation::run_simulations;
