//! System prompt construction for the documentation assistant

/// Site name used when none is configured
pub const DEFAULT_SITE_NAME: &str = "Z360 VoIP platform";

/// Wrap the grounding context in the assistant's instructions
pub fn build_system_prompt(site_name: &str, context: &str) -> String {
    format!(
        "You are a helpful assistant for the {site_name} documentation. \
         Answer questions based on the documentation context provided.\n\n\
         Context:\n{context}"
    )
}
