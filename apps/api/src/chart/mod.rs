// Subject chart data, its canonical text rendering, and calendar helpers.
// Charts are computed upstream; this module only reads them.

pub mod calendar;
#[cfg(test)]
pub mod fixtures;
pub mod formatter;
pub mod models;

pub use formatter::{prepare_subject, PreparedSubject};
pub use models::GenderIdentity;
