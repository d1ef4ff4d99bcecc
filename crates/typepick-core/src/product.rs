//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a product binary implements to configure
//! where templates come from and how it identifies itself.

/// Configuration trait for CLI products
///
/// Each product defines:
/// - Product identity (name, display name)
/// - Default template repository and its environment override
/// - CLI description text
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, config directory)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default repository URL for the template catalogue
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the template URL
    fn template_url_env(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
