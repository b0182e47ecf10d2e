pub mod assembler;
pub mod types;

pub use assembler::ChartAssembler;
pub use types::{
    BirthData, BodyPosition, ChartAngles, ChartComputation, ChartDiagnostics, HouseCusp,
    NatalChart, Observer, SkippedBody,
};
