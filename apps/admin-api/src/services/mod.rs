//! Business operations behind the admin routes.

pub mod provisioning;

pub use provisioning::{provision_tenant, ProvisionRequest, ProvisionResponse};
