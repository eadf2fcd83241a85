//! Standard connector command names.

pub const TEST_CONNECTION: &str = "std:test-connection";
pub const CHANGE_PASSWORD: &str = "std:change-password";
pub const SPEC_READ: &str = "std:spec:read";

pub const ACCOUNT_LIST: &str = "std:account:list";
pub const ACCOUNT_READ: &str = "std:account:read";
pub const ACCOUNT_CREATE: &str = "std:account:create";
pub const ACCOUNT_UPDATE: &str = "std:account:update";
pub const ACCOUNT_DELETE: &str = "std:account:delete";
pub const ACCOUNT_DISCOVER_SCHEMA: &str = "std:account:discover-schema";

pub const ENTITLEMENT_LIST: &str = "std:entitlement:list";
pub const ENTITLEMENT_READ: &str = "std:entitlement:read";

pub const SOURCE_DATA_DISCOVER: &str = "std:source-data:discover";
pub const SOURCE_DATA_READ: &str = "std:source-data:read";
