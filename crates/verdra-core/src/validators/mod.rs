//! Rule validators.
//!
//! Each validator is a pure function of the disclosure record: no shared
//! mutable state, no network, same input always produces the same result.

use thiserror::Error;

use crate::finding::ValidationResult;
use crate::record::DisclosureRecord;

mod completeness;
mod consistency;
mod quantification;
mod risk_coverage;

pub use completeness::CompletenessValidator;
pub use consistency::{ConsistencyValidator, ConsistencyRule};
pub use quantification::QuantificationValidator;
pub use risk_coverage::RiskCoverageValidator;

/// Errors from rule validators.
///
/// A validator error never aborts a pipeline run; the pipeline converts it
/// into a zero-score critical finding and continues.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("validator {validator} failed: {message}")]
    Internal { validator: String, message: String },
}

/// A rule validator evaluating one scored dimension of a disclosure.
///
/// # Isolation Contract
/// - MUST NOT share state with other validators
/// - MUST be idempotent: same record, same result
pub trait Validator: Send + Sync {
    /// Dimension name, also used as the result's `validator_name`.
    fn name(&self) -> &'static str;

    /// Evaluate the record and produce a scored result with findings.
    fn validate(&self, record: &DisclosureRecord) -> Result<ValidationResult, ValidatorError>;
}

/// The default validator set, in registration order.
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(ConsistencyValidator::new()),
        Box::new(QuantificationValidator::new()),
        Box::new(CompletenessValidator::new()),
        Box::new(RiskCoverageValidator::new()),
    ]
}
