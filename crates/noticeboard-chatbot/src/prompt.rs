//! Prompt construction for the portal assistant.

use std::fmt::Write as _;

use noticeboard_core::PortalSnapshot;

use crate::types::ChatMessage;

const ASSISTANT_INSTRUCTIONS: &str = "\
Your task is to:
1. Answer questions about announcements (titles, descriptions, dates, etc.)
2. Answer questions about users (names, emails, roles, etc.)
3. Summarize database content when asked
4. Generate insights about the data when requested
5. Stay factual and only report information that exists in the provided database
6. Be helpful, concise, and professional
7. If you don't know the answer or it's not in the database, say so politely

DO NOT make up information that is not in the database. If the user asks for \
information outside the database, politely explain that you can only provide \
information from the database.";

/// System prompt embedding the snapshot as JSON.
pub(crate) fn system_prompt(snapshot: &PortalSnapshot) -> Result<String, serde_json::Error> {
    let context = serde_json::to_string(snapshot)?;
    Ok(format!(
        "You are an AI assistant that helps users get information about announcements \
         and users from a database.\n\
         Here is the current database content in JSON format:\n\
         {context}\n\n\
         {ASSISTANT_INSTRUCTIONS}"
    ))
}

/// Flattens the system prompt, prior turns and the new query into the
/// role-tagged transcript the generate endpoint expects.
pub(crate) fn transcript(system: &str, history: &[ChatMessage], query: &str) -> String {
    let mut out = format!("<|system|>\n{system}\n</s>\n");
    for message in history {
        let _ = writeln!(
            out,
            "<|{}|>\n{}\n</s>",
            message.role.as_str(),
            message.content
        );
    }
    let _ = write!(out, "<|user|>\n{query}\n</s>\n<|assistant|>");
    out
}
