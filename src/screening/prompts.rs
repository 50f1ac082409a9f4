//! Prompt templates and fixed assistant messages.

/// Greeting request sent to the generator when a conversation opens.
pub const GREETING_PROMPT: &str = "\
You are TalentScout, an AI hiring assistant. Greet the candidate warmly and professionally.
Introduce yourself and explain that you'll be collecting their information step by step to help with the hiring process.
Keep your response friendly, professional, and under 100 words.";

/// System context attached to every generation call.
pub const SYSTEM_CONTEXT: &str = "\
You are TalentScout, an AI hiring assistant. Your role is to:
1. Collect candidate information professionally and efficiently
2. Generate one relevant technical question based on their tech stack
3. Maintain a friendly and professional tone
4. Provide helpful guidance when needed
5. Keep responses concise and clear";

/// Token the candidate may send instead of answering the technical question.
pub const SKIP_TOKEN: &str = "skip";

/// Prompt asking for one scenario-based question about `tech_stack`.
pub fn tech_question_prompt(tech_stack: &str) -> String {
    format!(
        "Based on the candidate's tech stack: {tech_stack}\n\n\
         Generate ONE practical scenario-based technical question that tests their understanding.\n\
         Make it relevant to their tech stack and suitable for a hiring interview.\n\
         Return only the question, no formatting or headers."
    )
}

/// Re-prompt after a rejected answer.
pub fn invalid_input_message(reason: &str) -> String {
    format!("Invalid input: {reason}. Please try again.")
}

/// Final assistant message.
pub fn completion_message(email: &str, phone: &str) -> String {
    format!(
        "Thanks for your interest and time. Our team will get back to you on your mail id {email} or phone {phone}."
    )
}
