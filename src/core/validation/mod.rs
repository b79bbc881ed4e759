//! Input validation and normalisation
//!
//! Request bodies deserialize into the lenient `*Input` types in [`input`], which
//! trim, check and convert themselves into domain values. Every violation in a
//! body is reported together; nothing is written until validation passes.

pub mod extractor;
pub mod filters;
pub mod input;
pub mod validators;

pub use extractor::JsonBody;
pub use input::{
    LoginInput, NewResourceInput, RateInput, RegisterInput, Registration, ResourceUpdateInput,
};
