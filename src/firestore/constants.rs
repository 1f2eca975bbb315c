pub const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_DATABASE_ID: &str = "(default)";
pub const FIRESTORE_EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";
