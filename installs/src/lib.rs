mod demo;
mod export;
mod model;
mod report;
mod selection;
mod source;

pub use demo::*;
pub use export::*;
pub use model::*;
pub use report::*;
pub use selection::*;
pub use source::*;
