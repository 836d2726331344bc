pub const APP_NAME: &str = "blueprint-prospector";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_label() -> String {
    format!("v{APP_VERSION}")
}

/// User agent sent with every remote request.
pub fn user_agent() -> String {
    format!("{APP_NAME}/{}", version_label())
}
