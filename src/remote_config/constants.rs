pub const REMOTE_CONFIG_API_URL: &str = "https://firebaseremoteconfig.googleapis.com";
