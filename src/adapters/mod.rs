pub mod opsgenie;
pub mod traits;

pub use opsgenie::OpsgenieClient;
pub use traits::AlertApiClient;

#[cfg(test)]
pub use traits::MockAlertApiClient;
