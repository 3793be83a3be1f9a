//! Step library for the Elite Shoppy demo store.

pub mod home;
pub mod mens;
pub mod signin;
pub mod signup;
pub mod validation;

use crate::steps::{StepError, StepRegistry};

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    home::register(registry)?;
    signin::register(registry)?;
    signup::register(registry)?;
    validation::register(registry)?;
    mens::register(registry)?;
    Ok(())
}
