pub mod builder;
pub mod generator;
pub mod records;
pub mod resolver;
pub mod store;

pub use records::QaRecord;
pub use resolver::FaqResolver;
pub use store::{FaqIndex, FaqIndexStore, IndexEntry, ScoredMatch};
