//! Environment variable names

/// Service-account JSON blob
pub const SERVICE_ACCOUNT_VAR: &str = "DV360_SERVICE_ACCOUNT";

/// Default partner id for advertiser listing
pub const PARTNER_ID_VAR: &str = "DV360_PARTNER_ID";
