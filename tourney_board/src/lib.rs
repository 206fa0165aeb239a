pub use auto_advance::*;
pub use choices::*;
pub use errors::*;
pub use evaluator::*;
pub use ex_stage::*;
pub use grid::*;
pub use intake::*;
pub use protocol_types::*;
pub use slots::*;
pub use state::*;
pub use swap::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod auto_advance;
mod choices;
mod errors;
mod evaluator;
mod ex_stage;
mod grid;
mod intake;
mod protocol_types;
mod slots;
mod state;
mod swap;
mod visualization;
