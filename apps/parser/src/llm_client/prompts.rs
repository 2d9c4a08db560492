// Prompt fragments owned by the client itself.
// Section prompts live in extraction::prompts.

/// System message for schema-guided extraction calls.
pub const EXTRACTION_SYSTEM: &str = "\
Extract and save the relevant entities mentioned in the following passage together with their properties. \
Call the provided function once per entity found. \
If a property is not present and is not required in the function parameters, do not include it in the output.";
