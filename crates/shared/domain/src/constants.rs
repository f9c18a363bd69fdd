//! Domain-level constants.
//!
//! Storage names are upper-case to match the `USER` table schema.

// =============================================================================
// Schema
// =============================================================================

/// Table holding user rows
pub const TABLE_USER: &str = "USER";

/// Required first name column
pub const COLUMN_FIRST_NAME: &str = "FIRSTNAME";

/// Required last name column
pub const COLUMN_LAST_NAME: &str = "LASTNAME";

// =============================================================================
// Fixtures
// =============================================================================

/// Number of users created by the default fixture
pub const DEFAULT_FIXTURE_SIZE: usize = 50;

/// First name prefix of fixture users (`John0`, `John1`, ...)
pub const FIXTURE_FIRST_NAME_PREFIX: &str = "John";

/// Last name prefix of fixture users (`Doe0`, `Doe1`, ...)
pub const FIXTURE_LAST_NAME_PREFIX: &str = "Doe";
