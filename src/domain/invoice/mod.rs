//! Invoice values - facts, calculated records and the export projection.

mod export;
mod facts;
mod record;

pub use export::{Retencoes, StatementLine, WithholdingStatement};
pub use facts::{DocumentKind, InvoiceFacts};
pub use record::CalculatedRecord;
