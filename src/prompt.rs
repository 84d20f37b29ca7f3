//! Instruction template wrapped around every prompt before it is sent.
//!
//! The wording is a convention between this crate and the inference
//! server's models, so each revision gets its own function and the
//! version number is bumped whenever the text changes.

/// Version used by [`wrap_prompt`]
pub const TEMPLATE_VERSION: u32 = 1;

const INSTRUCTIONS_V1: &str = "Please respond to my questions in Markdown format. \
If the response requires detail, use structured Markdown with headers and bullet points as needed. \
If the response is simple, such as a greeting, provide a brief Markdown response. \
Don't repeat the prompt you have given. \
Don't use code-block (```), use only ![Image](Image URL) for rendering images.";

/// Wrap with the current template
pub fn wrap_prompt(prompt: &str) -> String
{   wrap_prompt_v1(prompt)
}

/// First template revision
pub fn wrap_prompt_v1(prompt: &str) -> String
{   format!("{}\nQuestion: {}\n", INSTRUCTIONS_V1, prompt)
}
