//! Host platform utility functions

use std::path::PathBuf;
use thiserror::Error;

/// Environment variable giving the root of the software directory tree.
pub const SW_ROOT_ENV_VAR: &str = "AGRO_CAR_SW_ROOT";

/// Errors associated with the host environment.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("The software root environment variable (AGRO_CAR_SW_ROOT) is not set")]
    SwRootNotSet
}

/// Retrieve the software root directory from the environment.
pub fn get_agro_sw_root() -> Result<PathBuf, HostError> {
    match std::env::var(SW_ROOT_ENV_VAR) {
        Ok(p) => Ok(PathBuf::from(p)),
        Err(_) => Err(HostError::SwRootNotSet)
    }
}
