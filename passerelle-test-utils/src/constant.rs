//! Constant values shared by fixtures and tests.
//!
//! None of these are real credentials, they only need to be stable across a test run.

/// Password given to users created with `insert_user_with_password`.
pub static TEST_PASSWORD: &str = "correct-horse-battery-staple";

/// Plain bearer token inserted by `insert_access_token` when no token is provided.
pub static TEST_ACCESS_TOKEN: &str = "test-access-token-0123456789abcdef";

/// Département code used by fixtures that don't care about territories.
pub static TEST_CODE_DEPARTEMENT: &str = "64";

/// Région code used by fixtures that don't care about territories.
pub static TEST_CODE_REGION: &str = "75";

/// EPCI SIREN used by `insert_test_territories`.
pub static TEST_SIREN_EPCI: &str = "200067106";

/// Commune INSEE code used by `insert_test_territories`, within [`TEST_CODE_DEPARTEMENT`].
pub static TEST_CODE_INSEE: &str = "64102";
